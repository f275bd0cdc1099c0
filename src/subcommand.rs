use {
  super::*,
  clap::builder::{
    styling::{AnsiColor, Effects},
    Styles,
  },
};

mod captions;
mod merge;
mod probe;
mod render;
mod server;

#[derive(Debug, Parser)]
#[command(
  version,
  styles = Styles::styled()
    .header(AnsiColor::Green.on_default() | Effects::BOLD)
    .usage(AnsiColor::Green.on_default() | Effects::BOLD)
    .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
    .placeholder(AnsiColor::Cyan.on_default()))
]
pub enum Subcommand {
  #[command(about = "Write ASS subtitles from word timestamps")]
  Captions(captions::Captions),
  #[command(about = "Concatenate videos, optionally over background music")]
  Merge(merge::Merge),
  #[command(about = "Print media information as JSON")]
  Probe(probe::Probe),
  #[command(about = "Render a video from a YAML recipe")]
  Render(render::Render),
  #[command(about = "Serve assets over HTTP")]
  Server(server::Server),
}

impl Subcommand {
  pub fn run(self) -> Result {
    match self {
      Self::Captions(captions) => captions.run(),
      Self::Merge(merge) => merge.run(),
      Self::Probe(probe) => probe.run(),
      Self::Render(render) => render.run(),
      Self::Server(server) => server.run(),
    }
  }
}
