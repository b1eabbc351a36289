// cli.rs - Command-line interface configuration
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "fb-viewer", version)]
#[command(about = "Live viewer for a Linux framebuffer device", long_about = None)]
pub struct Cli {
    /// Framebuffer id (e.g. `1`) or full device path (e.g. `/dev/fb1`)
    pub device: Option<String>,
}
