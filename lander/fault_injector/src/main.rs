mod injector;

use dora_node_api::{
    arrow::array::{Array, BinaryArray},
    dora_core::config::DataId,
    DoraNode, Event,
};
use eyre::Result;
use fault_sim_lib::{
    init_tracing, FaultInjectorConfig, FaultsConfig, JointStateMessage, RngFaultRandom,
};
use injector::{FaultInjector, RelayMessage};
use std::error::Error;
use tracing::{debug, info, warn};

const INPUT_JOINT_STATES: &str = "joint_states_original";
const INPUT_FAULTS_CONFIG: &str = "faults_config";

#[derive(Debug, Default)]
struct RelayStats {
    telemetry_relayed: u64,
    telemetry_discarded: u64,
    config_updates: u64,
    config_discarded: u64,
    messages_sent: u64,
    send_failures: u64,
}

fn first_payload(data: &dyn Array) -> Option<&[u8]> {
    let array = data.as_any().downcast_ref::<BinaryArray>()?;
    if array.len() > 0 {
        Some(array.value(0))
    } else {
        None
    }
}

/// Payload of an input, or `None` after logging and counting it as discarded.
fn payload_or_discard<'a>(
    input: &str,
    data: &'a dyn Array,
    discarded: &mut u64,
) -> Option<&'a [u8]> {
    let payload = first_payload(data);
    if payload.is_none() {
        warn!(
            "Discarding {} input without a binary payload ({} rows of {:?})",
            input,
            data.len(),
            data.data_type()
        );
        *discarded += 1;
    }
    payload
}

fn publish(node: &mut DoraNode, message: &RelayMessage, stats: &mut RelayStats) {
    let serialized = match message.to_json() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to serialize {}: {}", message.output_id(), e);
            stats.send_failures += 1;
            return;
        }
    };

    let arrow_data = BinaryArray::from_vec(vec![serialized.as_slice()]);
    let output_id = DataId::from(message.output_id().to_owned());

    if let Err(e) = node.send_output(output_id, Default::default(), arrow_data) {
        warn!("Failed to send {}: {}", message.output_id(), e);
        stats.send_failures += 1;
    } else {
        stats.messages_sent += 1;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let _guard = init_tracing();

    info!("Starting fault injector node");

    let config_path = std::env::var("FAULT_INJECTOR_CONFIG")
        .unwrap_or_else(|_| "config/fault_injector.toml".to_string());
    let config = FaultInjectorConfig::load_or_default(&config_path)?;

    info!("Frame id: {}", config.frame_id);
    info!(
        "State of charge faults: low={:.1}%, capacity loss={:.1}%",
        config.low_state_of_charge, config.instantaneous_capacity_loss_state_of_charge
    );
    info!(
        "Thermal overload range: [{:.1}, {:.1}) C",
        config.thermal_overload_min, config.thermal_overload_max
    );
    if config.initial_faults.any_active() {
        info!("Initial faults: {:?}", config.initial_faults.active_faults());
    }

    let random = RngFaultRandom::from_seed_option(config.rng_seed);
    let mut fault_injector = FaultInjector::new(config, random);

    let (mut node, mut events) = DoraNode::init_from_env()?;
    let mut stats = RelayStats::default();

    while let Some(event) = events.recv() {
        match event {
            Event::Input {
                id,
                metadata: _,
                data,
            } => match id.as_str() {
                INPUT_JOINT_STATES => {
                    let Some(bytes) = payload_or_discard(
                        INPUT_JOINT_STATES,
                        &**data,
                        &mut stats.telemetry_discarded,
                    ) else {
                        continue;
                    };

                    let msg = match serde_json::from_slice::<JointStateMessage>(bytes) {
                        Ok(msg) => msg,
                        Err(e) => {
                            warn!("Failed to parse joint states: {}", e);
                            stats.telemetry_discarded += 1;
                            continue;
                        }
                    };

                    match fault_injector.handle_telemetry_update(&msg) {
                        Ok(output) => {
                            let state_of_charge = output.state_of_charge();
                            if !state_of_charge.is_empty() {
                                debug!("Publishing state of charge fault: {:?}", state_of_charge);
                            }
                            if let Some(temperature) = output.temperature_increase() {
                                debug!("Publishing thermal fault: {:.1} C", temperature);
                            }
                            for message in output.into_messages() {
                                publish(&mut node, &message, &mut stats);
                            }
                            stats.telemetry_relayed += 1;
                        }
                        Err(e) => {
                            warn!("Discarding joint states: {}", e);
                            stats.telemetry_discarded += 1;
                        }
                    }
                }

                INPUT_FAULTS_CONFIG => {
                    let Some(bytes) = payload_or_discard(
                        INPUT_FAULTS_CONFIG,
                        &**data,
                        &mut stats.config_discarded,
                    ) else {
                        continue;
                    };

                    match serde_json::from_slice::<FaultsConfig>(bytes) {
                        Ok(faults) => {
                            fault_injector.handle_configuration_update(faults);
                            stats.config_updates += 1;
                        }
                        Err(e) => {
                            warn!("Failed to parse fault configuration: {}", e);
                            stats.config_discarded += 1;
                        }
                    }
                }

                other => {
                    debug!("Unknown input id: {}", other);
                }
            },

            Event::Stop(_) => {
                info!("Stop event received");
                break;
            }

            _ => {}
        }
    }

    info!("Fault injector shutting down");
    info!("  Active faults: {:?}", fault_injector.faults().active_faults());
    if let Some(temperature) = fault_injector.thermal_overload() {
        info!("  Thermal overload episode open at {:.1} C", temperature);
    }
    info!("  Telemetry relayed: {}", stats.telemetry_relayed);
    info!("  Telemetry discarded: {}", stats.telemetry_discarded);
    info!(
        "  Config updates: {} ({} discarded)",
        stats.config_updates, stats.config_discarded
    );
    info!(
        "  Messages sent: {} ({} failures)",
        stats.messages_sent, stats.send_failures
    );

    Ok(())
}
