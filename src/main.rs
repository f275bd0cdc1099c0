#![allow(clippy::result_large_err)]

use {
  self::{
    ass_time::AssTime,
    background::Background,
    caption::{Segment, Word},
    composition::Composition,
    deserialize_from_str::DeserializeFromStr,
    dimensions::Dimensions,
    error::Error,
    ffmpeg::Ffmpeg,
    ken_burns::KenBurns,
    path_ext::{PathBufExt, PathExt},
    probe::{AudioInfo, Probe, VideoInfo},
    progress::Line,
    recipe::Recipe,
    subcommand::Subcommand,
    subtitle_style::SubtitleStyle,
    threads::Threads,
  },
  axum::http::header,
  camino::{Utf8Path, Utf8PathBuf},
  clap::Parser,
  libc::EXIT_FAILURE,
  mime_guess::Mime,
  once_cell::sync::Lazy,
  regex::Regex,
  regex_static::lazy_regex,
  serde::{Deserialize, Deserializer, Serialize},
  snafu::{ensure, ErrorCompat, OptionExt, ResultExt, Snafu},
  std::{
    backtrace::{Backtrace, BacktraceStatus},
    fmt::{self, Display, Formatter},
    fs,
    io::{self, BufRead, BufReader},
    net::SocketAddr,
    num::ParseIntError,
    ops::{Deref, DerefMut},
    path::PathBuf,
    process::{self, Command, ExitStatus, Stdio},
    str::FromStr,
    sync::Arc,
    time::Instant,
  },
  strum::{Display as EnumDisplay, EnumString},
  walkdir::WalkDir,
};


#[cfg(test)]
use test::*;

mod ass_time;
mod background;
mod caption;
mod composition;
mod deserialize_from_str;
mod dimensions;
mod error;
mod ffmpeg;
mod ken_burns;
mod path_ext;
mod probe;
mod progress;
mod recipe;
mod subcommand;
mod subtitle_style;
mod threads;

type Result<T = (), E = Error> = std::result::Result<T, E>;

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  if let Err(err) = Subcommand::parse().run() {
    err.report();
    process::exit(EXIT_FAILURE)
  }
}
