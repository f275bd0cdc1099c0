use {super::*, crate::probe::Probe as _};

#[derive(Debug, Parser)]
pub struct Probe {
  #[arg(long, help = "Report the first audio stream instead of the first video stream.")]
  audio: bool,
  #[arg(help = "Inspect media file <PATH>.")]
  path: Utf8PathBuf,
  #[command(flatten)]
  ffmpeg: Ffmpeg,
}

impl Probe {
  pub fn run(self) -> Result {
    println!("{}", self.info()?);
    Ok(())
  }

  fn info(&self) -> Result<String> {
    let json = if self.audio {
      serde_json::to_string_pretty(&self.ffmpeg.audio_info(&self.path)?)
    } else {
      serde_json::to_string_pretty(&self.ffmpeg.video_info(&self.path)?)
    };

    json.context(error::SerializeInfo)
  }
}
