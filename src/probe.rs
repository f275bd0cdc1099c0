use super::*;

pub(crate) trait Probe {
  fn audio_info(&self, path: &Utf8Path) -> Result<AudioInfo>;

  fn video_info(&self, path: &Utf8Path) -> Result<VideoInfo>;
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct VideoInfo {
  pub(crate) duration: f64,
  pub(crate) width: Option<u32>,
  pub(crate) height: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct AudioInfo {
  pub(crate) duration: f64,
  pub(crate) channels: u32,
}

#[derive(Deserialize)]
struct Output {
  #[serde(default)]
  format: Format,
  #[serde(default)]
  streams: Vec<Stream>,
}

#[derive(Default, Deserialize)]
struct Format {
  duration: Option<DeserializeFromStr<f64>>,
}

#[derive(Deserialize)]
struct Stream {
  width: Option<u32>,
  height: Option<u32>,
  #[serde(default)]
  channels: u32,
}

impl Output {
  fn parse(path: &Utf8Path, json: &str, stream: &'static str) -> Result<(f64, Stream)> {
    let output = serde_json::from_str::<Self>(json).context(error::DeserializeProbe { path })?;

    let duration = output.format.duration.map(|duration| *duration).unwrap_or_default();

    let stream = output
      .streams
      .into_iter()
      .next()
      .context(error::NoStream { path, stream })?;

    Ok((duration, stream))
  }
}

impl VideoInfo {
  pub(crate) const SELECTOR: &'static str = "v:0";

  pub(crate) fn parse(path: &Utf8Path, json: &str) -> Result<Self> {
    let (duration, stream) = Output::parse(path, json, "video")?;

    Ok(Self {
      duration,
      width: stream.width,
      height: stream.height,
    })
  }
}

impl AudioInfo {
  pub(crate) const SELECTOR: &'static str = "a:0";

  pub(crate) fn parse(path: &Utf8Path, json: &str) -> Result<Self> {
    let (duration, stream) = Output::parse(path, json, "audio")?;

    Ok(Self {
      duration,
      channels: stream.channels,
    })
  }
}
