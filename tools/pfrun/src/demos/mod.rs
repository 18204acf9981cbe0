use clap::ValueEnum;
use picoframe::App;

mod bars;
mod dual_core;
mod text;

pub use bars::Bars;
pub use dual_core::DualCore;
pub use text::TextDemo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// Scrolling color bars; left/right steer, held buttons are listed
    Bars,
    /// Wrapped text under a translucent box
    Text,
    /// Core 1 renders a 160x144 picture, core 0 shows it
    DualCore,
}

impl Demo {
    pub fn build(self) -> Box<dyn App> {
        match self {
            Demo::Bars => Box::new(Bars::default()),
            Demo::Text => Box::new(TextDemo::default()),
            Demo::DualCore => Box::new(DualCore::default()),
        }
    }
}
