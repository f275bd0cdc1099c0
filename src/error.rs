use super::*;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub))]
pub(crate) enum Error {
  #[snafu(display("image background at `{path}` requires an audio track"))]
  AudioRequired {
    backtrace: Option<Backtrace>,
    path: Utf8PathBuf,
  },
  #[snafu(display("could not determine duration of audio `{path}`"))]
  AudioDuration {
    backtrace: Option<Backtrace>,
    path: Utf8PathBuf,
  },
  #[snafu(display("composition has no background image or video"))]
  BackgroundMissing { backtrace: Option<Backtrace> },
  #[snafu(display("composition needs an audio track, subtitles, or both"))]
  ContentMissing { backtrace: Option<Backtrace> },
  #[snafu(display("failed to deserialize YAML recipe at `{path}`"))]
  DeserializeRecipe {
    backtrace: Option<Backtrace>,
    path: Utf8PathBuf,
    source: serde_yaml::Error,
  },
  #[snafu(display("failed to deserialize ffprobe output for `{path}`"))]
  DeserializeProbe {
    backtrace: Option<Backtrace>,
    path: Utf8PathBuf,
    source: serde_json::Error,
  },
  #[snafu(display("failed to deserialize JSON words at `{path}`"))]
  DeserializeWords {
    backtrace: Option<Backtrace>,
    path: Utf8PathBuf,
    source: serde_json::Error,
  },
  #[snafu(display("invalid dimensions `{input}`, expected `<WIDTH>x<HEIGHT>`"))]
  DimensionsFormat {
    backtrace: Option<Backtrace>,
    input: String,
  },
  #[snafu(display("invalid dimension in `{input}`"))]
  DimensionsInteger {
    backtrace: Option<Backtrace>,
    input: String,
    source: ParseIntError,
  },
  #[snafu(display("dimensions `{input}` must be non-zero"))]
  DimensionsZero {
    backtrace: Option<Backtrace>,
    input: String,
  },
  #[snafu(display("ffmpeg {operation} failed with {status}"))]
  FfmpegStatus {
    backtrace: Option<Backtrace>,
    operation: String,
    status: ExitStatus,
  },
  #[snafu(display("ffprobe failed on `{path}`: {stderr}"))]
  FfprobeStatus {
    backtrace: Option<Backtrace>,
    path: Utf8PathBuf,
    stderr: String,
  },
  #[snafu(display("I/O error at `{path}`"))]
  Io {
    backtrace: Option<Backtrace>,
    path: Utf8PathBuf,
    source: io::Error,
  },
  #[snafu(display("no videos to merge"))]
  MergeEmpty { backtrace: Option<Backtrace> },
  #[snafu(display("no {stream} stream found in `{path}`"))]
  NoStream {
    backtrace: Option<Backtrace>,
    path: Utf8PathBuf,
    stream: &'static str,
  },
  #[snafu(
    display("path contains invalid UTF-8: `{}`", path.display())
  )]
  PathUnicode {
    backtrace: Option<Backtrace>,
    path: PathBuf,
  },
  #[snafu(display("I/O error initializing async runtime"))]
  Runtime {
    backtrace: Option<Backtrace>,
    source: io::Error,
  },
  #[snafu(display("I/O error serving on {address}"))]
  Serve {
    address: SocketAddr,
    backtrace: Option<Backtrace>,
    source: io::Error,
  },
  #[snafu(display("failed to serialize media info"))]
  SerializeInfo {
    backtrace: Option<Backtrace>,
    source: serde_json::Error,
  },
  #[snafu(display("failed to run `{program}`"))]
  Spawn {
    backtrace: Option<Backtrace>,
    program: Utf8PathBuf,
    source: io::Error,
  },
  #[snafu(display("failed to create temporary directory"))]
  TempDir {
    backtrace: Option<Backtrace>,
    source: io::Error,
  },
  #[snafu(display("failed to walk directory `{root}`"))]
  WalkDir {
    backtrace: Option<Backtrace>,
    root: Utf8PathBuf,
    source: walkdir::Error,
  },
}

impl Error {
  pub(crate) fn report(&self) {
    eprintln!("error: {self}");

    for (i, err) in self.iter_chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();
        eprintln!("because:");
      }

      eprintln!("- {err}");
    }

    if let Some(backtrace) = self.backtrace() {
      if backtrace.status() == BacktraceStatus::Captured {
        eprintln!();
        eprintln!("backtrace:");
        eprintln!("{backtrace}");
      }
    }
  }
}
