//! Application wiring and the main event loop.

use std::time::Duration;

use anyhow::Context as _;
use tokio::time::Instant;

use rv_rosbridge::{
    BridgeConnection, ConnectionConfig, ConnectionEvent, ConnectionHandle,
};
use rv_subscriber::{CameraEvent, SubscriptionManager};
use rv_telemetry::{commands, MessageKind, TelemetryBridge};

use crate::cli::Cli;
use crate::console::ConsoleSink;

/// Run the roverview application.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConnectionConfig {
        endpoint: cli.endpoint.clone(),
        retry_delay: Duration::from_millis(cli.reconnect_delay_ms),
    };
    let (handle, mut events) = BridgeConnection::spawn(config);

    handle.register_publisher(&cli.goal_topic, "geometry_msgs/PoseStamped");
    handle.register_publisher(&cli.cancel_topic, "actionlib_msgs/GoalID");

    let mut bridge = TelemetryBridge::new(ConsoleSink::default());
    let mut manager = SubscriptionManager::new(
        handle.clone(),
        Duration::from_millis(cli.probe_timeout_ms),
    );

    // The fixed topic set. Registrations made while the link is still down
    // are replayed on the first Ready.
    for (topic, kind) in [
        (&cli.scan_topic, MessageKind::LaserScan),
        (&cli.path_topic, MessageKind::Path),
        (&cli.status_topic, MessageKind::GoalStatus),
    ] {
        manager.subscribe(topic, kind.type_name());
        bridge.add_topic(topic, kind.type_name());
    }
    if !cli.no_camera {
        manager.subscribe_camera(&cli.camera_topic, Instant::now());
        bridge.add_topic(
            &format!("{}/compressed", cli.camera_topic),
            MessageKind::CompressedImage.type_name(),
        );
    }

    let mut commands_sent = false;
    let mut msg_count: u64 = 0;

    loop {
        // Recomputed each turn: probes die as they commit or unsubscribe.
        let probe_deadline = manager.next_probe_deadline();

        tokio::select! {
            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    // Driver gone; nothing further will arrive.
                    break;
                };
                match event {
                    ConnectionEvent::Status(state, reason) => {
                        bridge.connection_status(state, &reason);
                    }
                    ConnectionEvent::Ready => {
                        manager.resubscribe_all();
                        if !commands_sent {
                            commands_sent = true;
                            send_initial_commands(&cli, &handle, &mut bridge)?;
                        }
                    }
                    ConnectionEvent::Message(msg) => {
                        let Some(routed) = manager.route(&msg) else {
                            continue;
                        };
                        if let Some(CameraEvent::CommittedCompressed { topic }) =
                            routed.camera_event
                        {
                            tracing::info!("camera committed to compressed stream on {topic}");
                        }
                        if let Err(e) = bridge.process_message(&msg) {
                            tracing::warn!(
                                "Failed to process message on {}: {e}",
                                msg.topic_name
                            );
                        }
                        msg_count += 1;
                    }
                }
            }
            () = probe_wait(probe_deadline) => {
                for event in manager.handle_probe_timeout(Instant::now()) {
                    if let CameraEvent::FellBackToRaw { compressed_topic, raw_topic } = event {
                        bridge.remove_topic(&compressed_topic);
                        bridge.add_topic(&raw_topic, MessageKind::RawImage.type_name());
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                handle.shutdown();
                break;
            }
        }
    }

    tracing::info!("Processed {msg_count} messages");
    Ok(())
}

/// Wait for the probe deadline; pends forever when none is armed.
async fn probe_wait(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Publish the one-shot `--goal` / `--cancel` commands from the CLI. These
/// travel the same encoder path a click-to-set-goal frontend would use.
fn send_initial_commands(
    cli: &Cli,
    handle: &ConnectionHandle,
    bridge: &mut TelemetryBridge<ConsoleSink>,
) -> anyhow::Result<()> {
    if cli.cancel {
        let msg = serde_json::to_value(commands::cancel_message())
            .context("encoding cancel command")?;
        handle
            .publish(&cli.cancel_topic, msg)
            .context("publishing cancel command")?;
        bridge.clear_goal();
        tracing::info!("Cancelled all outstanding goals");
    }

    if let Some(goal) = cli.goal {
        let msg = serde_json::to_value(commands::goal_message(goal.x, goal.y, goal.yaw))
            .context("encoding goal command")?;
        handle
            .publish(&cli.goal_topic, msg)
            .context("publishing goal command")?;
        bridge.set_goal(goal.x, goal.y);
        tracing::info!(
            "Published navigation goal ({}, {}) with yaw {}",
            goal.x,
            goal.y,
            goal.yaw
        );
    }

    Ok(())
}
