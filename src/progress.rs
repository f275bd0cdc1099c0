use super::*;

// Banner, stream layout and encoder statistics that ffmpeg prints on every run.
const NOISE: &[&str] = &[
  "ffmpeg version",
  "built with",
  "configuration:",
  "libav",
  "Input #",
  "Metadata:",
  "Duration:",
  "Stream #",
  "Press [q]",
  "Output #",
  "Stream mapping:",
  "frame=",
  "fps=",
  "[libx264",
  "kb/s:",
  "Qavg:",
  "video:",
  "audio:",
  "subtitle:",
  "frame I:",
  "frame P:",
  "mb I",
  "mb P",
  "coded y,",
  "i16 v,h,dc,p:",
  "i8c dc,h,v,p:",
  "compatible_brands:",
  "encoder",
  "Side data:",
  "libswscale",
  "libswresample",
  "libpostproc",
];

// Container metadata lines, only noise when they look like `key: value`.
const HEADERS: &[&str] = &[
  "major_brand",
  "minor_version",
  "creation_time",
  "handler_name",
  "vendor_id",
  "Duration",
  "bitrate",
];

static TIME: Lazy<Regex> = lazy_regex!(r"time=(\S+)");

#[derive(Debug, PartialEq)]
pub(crate) enum Line {
  Progress { percent: f64, time: String },
  Noise,
  Message(String),
}

pub(crate) fn classify(line: &str, expected_duration: Option<f64>) -> Line {
  if let Some(expected) = expected_duration.filter(|duration| *duration > 0.0) {
    if line.contains("time=") && line.contains("speed=") {
      return match progress(line, expected) {
        Some(progress) => progress,
        None => Line::Noise,
      };
    }
  }

  if NOISE.iter().any(|keyword| line.contains(keyword)) {
    return Line::Noise;
  }

  let trimmed = line.trim();

  if trimmed.is_empty() || trimmed.starts_with('[') {
    return Line::Noise;
  }

  if line.contains(':') && HEADERS.iter().any(|header| line.contains(header)) {
    return Line::Noise;
  }

  Line::Message(trimmed.into())
}

fn progress(line: &str, expected: f64) -> Option<Line> {
  let time = TIME.captures(line)?.get(1)?.as_str();

  let mut parts = time.split(':');

  let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
  else {
    return None;
  };

  let seconds = h.parse::<f64>().ok()? * 3600.0 + m.parse::<f64>().ok()? * 60.0 + s.parse::<f64>().ok()?;

  Some(Line::Progress {
    percent: (seconds / expected * 100.0).min(100.0),
    time: time.into(),
  })
}

pub(crate) fn clock(seconds: f64) -> String {
  let seconds = seconds.max(0.0);
  let hours = (seconds / 3600.0).floor() as u64;
  let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
  let seconds = (seconds % 60.0).floor() as u64;
  format!("{hours:02}:{minutes:02}:{seconds:02}")
}
