use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{debug, info};
use rand::Rng;
use speedometer::config::DEFAULT_FRAMERATE;
use speedometer::{Appearance, GaugeCommand, GaugeConfig, Speedometer, WindowConfig};

/// Shows a speedometer whose needle is kicked to a random speed at a fixed
/// interval and left to fall back.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Speed at the end of the dial
    #[arg(long, default_value_t = 300.0)]
    max_speed: f64,

    /// Initial window width and height, in logical pixels
    #[arg(long, default_value_t = 400)]
    size: u32,

    /// Frame rate of the needle animation
    #[arg(long, default_value_t = DEFAULT_FRAMERATE)]
    fps: f64,

    /// Time between kicks
    #[arg(long, default_value_t = 2000)]
    interval_ms: u64,

    /// How long the needle is held at the kicked speed before falling back
    #[arg(long, default_value_t = 800)]
    hold_ms: u64,

    /// Kicks land uniformly below this speed
    #[arg(long, default_value_t = 140.0)]
    top_speed: f64,

    /// TrueType/OpenType font for the speed labels
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let speedometer = Speedometer::new(
        GaugeConfig::new(args.max_speed),
        Appearance::default(),
        WindowConfig::builder()
            .width(args.size)
            .height(args.size)
            .max_framerate(args.fps)
            .maybe_font_path(args.font)
            .build(),
    )?;

    let (sender, receiver) = mpsc::channel();
    let interval = Duration::from_millis(args.interval_ms);
    let hold = Duration::from_millis(args.hold_ms);
    let top_speed = args.top_speed;

    // Drive the gauge the way a car would be: floor it, hold, let go.
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut next = Instant::now() + interval;
        loop {
            thread::sleep(next.saturating_duration_since(Instant::now()));
            next += interval;

            let speed = rng.random_range(0..100u32) as f64 / 100.0 * top_speed;
            debug!("kicking needle to {:.1}", speed);
            let kick = [
                GaugeCommand::StartAccelerating,
                GaugeCommand::SetSpeed(speed),
            ];
            if kick.iter().any(|cmd| sender.send(*cmd).is_err()) {
                break;
            }

            thread::sleep(hold);
            if sender.send(GaugeCommand::EndAccelerating).is_err() {
                break;
            }
        }
    });

    info!("close the window to exit");
    speedometer.show_with_commands(receiver)?;
    Ok(())
}
