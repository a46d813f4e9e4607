//! Command-line interface for the roverview console.

use clap::Parser;

/// Headless rosbridge telemetry console for a robot.
///
/// Connects to a rosbridge server over WebSocket, subscribes to the robot's
/// sensor topics, and streams decoded telemetry to the console. Reconnects
/// forever until interrupted.
#[derive(Parser, Debug)]
#[command(name = "roverview", version, about)]
pub struct Cli {
    /// WebSocket endpoint of the rosbridge server.
    #[arg(long, default_value = "ws://127.0.0.1:9090")]
    pub endpoint: String,

    /// Range-scan topic.
    #[arg(long, default_value = "/scan")]
    pub scan_topic: String,

    /// Planned-path topic.
    #[arg(long, default_value = "/move_base/NavfnROS/plan")]
    pub path_topic: String,

    /// Navigation status topic.
    #[arg(long, default_value = "/move_base/status")]
    pub status_topic: String,

    /// Camera base topic; `<topic>/compressed` is probed first.
    #[arg(long, default_value = "/camera/rgb/image_raw")]
    pub camera_topic: String,

    /// Disable the camera subscription.
    #[arg(long)]
    pub no_camera: bool,

    /// Navigation goal topic (published).
    #[arg(long, default_value = "/move_base_simple/goal")]
    pub goal_topic: String,

    /// Goal cancel topic (published).
    #[arg(long, default_value = "/move_base/cancel")]
    pub cancel_topic: String,

    /// Reconnect delay in milliseconds.
    #[arg(long, default_value = "3000")]
    pub reconnect_delay_ms: u64,

    /// Camera fallback probe timeout in milliseconds.
    #[arg(long, default_value = "3000")]
    pub probe_timeout_ms: u64,

    /// Publish a navigation goal as `x,y,yaw` once connected.
    #[arg(long, value_parser = parse_goal)]
    pub goal: Option<GoalRequest>,

    /// Cancel all outstanding navigation goals once connected.
    #[arg(long)]
    pub cancel: bool,
}

/// An `x,y,yaw` goal triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalRequest {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

fn parse_goal(input: &str) -> Result<GoalRequest, String> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected `x,y,yaw`, got `{input}`"));
    }
    let parse = |part: &str, name: &str| {
        part.parse::<f64>()
            .map_err(|e| format!("bad {name} `{part}`: {e}"))
    };
    Ok(GoalRequest {
        x: parse(parts[0], "x")?,
        y: parse(parts[1], "y")?,
        yaw: parse(parts[2], "yaw")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_goal_triple() {
        assert_eq!(
            parse_goal("1.5, -2, 0.78").unwrap(),
            GoalRequest {
                x: 1.5,
                y: -2.0,
                yaw: 0.78
            }
        );
    }

    #[test]
    fn test_parse_goal_rejects_bad_input() {
        assert!(parse_goal("1.5,2").is_err());
        assert!(parse_goal("a,b,c").is_err());
        assert!(parse_goal("").is_err());
    }
}
