use anyhow::Result;
use clap::Parser;
use fb_viewer::cli::Cli;
use fb_viewer::device::{DevicePath, Framebuffer};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let path = DevicePath::resolve(cli.device.as_deref())?;

    // Dropped after the display is torn down: unmaps, then closes the device
    let framebuffer = Framebuffer::open(path)?;
    fb_viewer::app::run(&framebuffer)?;

    Ok(())
}
