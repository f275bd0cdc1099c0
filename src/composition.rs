use super::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Composition {
  audio: Option<Utf8PathBuf>,
  background: Option<Background>,
  dimensions: Dimensions,
  output: Utf8PathBuf,
  subtitles: Option<Utf8PathBuf>,
}

impl Composition {
  pub(crate) fn new(dimensions: Dimensions) -> Self {
    Self {
      audio: None,
      background: None,
      dimensions,
      output: "output.mp4".into(),
      subtitles: None,
    }
  }

  fn background(mut self, background: Background) -> Self {
    self.background = Some(background);
    self
  }

  pub(crate) fn background_image(self, path: impl Into<Utf8PathBuf>, ken_burns: KenBurns) -> Self {
    self.background(Background::Image {
      path: path.into(),
      ken_burns,
    })
  }

  pub(crate) fn background_video(self, path: impl Into<Utf8PathBuf>) -> Self {
    self.background(Background::Video { path: path.into() })
  }

  pub(crate) fn audio(mut self, path: impl Into<Utf8PathBuf>) -> Self {
    self.audio = Some(path.into());
    self
  }

  pub(crate) fn subtitles(mut self, path: impl Into<Utf8PathBuf>) -> Self {
    self.subtitles = Some(path.into());
    self
  }

  pub(crate) fn output(mut self, path: impl Into<Utf8PathBuf>) -> Self {
    self.output = path.into();
    self
  }

  fn audio_duration(&self, probe: &impl Probe) -> Result<Option<f64>> {
    let Some(audio) = &self.audio else {
      return Ok(None);
    };

    let duration = probe.audio_info(audio)?.duration;

    ensure!(duration > 0.0, error::AudioDuration { path: audio });

    Ok(Some(duration))
  }

  pub(crate) fn command(&self, probe: &impl Probe) -> Result<Vec<String>> {
    self.validate()?;
    self.arguments(self.audio_duration(probe)?)
  }

  fn validate(&self) -> Result {
    let background = self.background.as_ref().context(error::BackgroundMissing)?;

    ensure!(
      self.audio.is_some() || self.subtitles.is_some(),
      error::ContentMissing
    );

    if let Background::Image { path, .. } = background {
      ensure!(self.audio.is_some(), error::AudioRequired { path });
    }

    Ok(())
  }

  fn arguments(&self, duration: Option<f64>) -> Result<Vec<String>> {
    let background = self.background.as_ref().context(error::BackgroundMissing)?;

    let Dimensions { width, height } = self.dimensions;

    let mut arguments = vec!["-y".to_string()];

    let mut filters = Vec::new();

    match (background, duration) {
      (Background::Image { path, ken_burns }, Some(duration)) => {
        arguments.extend([
          "-loop".into(),
          "1".into(),
          "-t".into(),
          format!("{duration:?}"),
          "-i".into(),
          path.to_string(),
        ]);
        filters.push(ken_burns.filter(self.dimensions, duration));
      }
      (Background::Image { path, .. }, None) => {
        return error::AudioRequired { path }.fail();
      }
      (Background::Video { path }, duration) => {
        if let Some(duration) = duration {
          arguments.extend([
            "-stream_loop".into(),
            "-1".into(),
            "-t".into(),
            format!("{duration:?}"),
          ]);
        }
        arguments.extend(["-i".into(), path.to_string()]);
        filters.push(format!("[0]scale={width}:{height}[bg]"));
      }
    }

    if let Some(audio) = &self.audio {
      arguments.extend(["-i".into(), audio.to_string()]);
    }

    match &self.subtitles {
      Some(subtitles) => filters.push(format!("[bg]subtitles={}[v]", filter_path(subtitles))),
      None => filters.push("[bg]copy[v]".into()),
    }

    arguments.extend(["-filter_complex".into(), filters.join(";")]);

    arguments.extend(["-map".into(), "[v]".into()]);

    if self.audio.is_some() {
      arguments.extend(["-map".into(), "1:a".into()]);
    }

    arguments.extend(
      [
        "-c:v",
        "libx264",
        "-preset",
        "ultrafast",
        "-crf",
        "23",
        "-pix_fmt",
        "yuv420p",
      ]
      .map(String::from),
    );

    if self.audio.is_some() {
      arguments.extend(["-c:a", "aac", "-b:a", "192k"].map(String::from));

      if let Some(duration) = duration {
        arguments.extend(["-t".into(), format!("{duration:?}")]);
      }
    }

    arguments.push(self.output.to_string());

    Ok(arguments)
  }

  pub(crate) fn execute(&self, ffmpeg: &Ffmpeg) -> Result {
    let start = Instant::now();

    let context = format!(
      "dimensions={} background={} audio={} subtitles={} output={}",
      self.dimensions,
      self
        .background
        .as_ref()
        .map(|background| format!("{}:{}", background.ty(), background.path()))
        .unwrap_or_else(|| "none".into()),
      self.audio.is_some(),
      self.subtitles.is_some(),
      self.output,
    );

    log::debug!("building video: {context}");

    let result = self.command(ffmpeg).and_then(|arguments| {
      let expected_duration = match (&self.audio, &self.background) {
        (Some(audio), _) => Some(ffmpeg.audio_info(audio)?.duration),
        (None, Some(Background::Video { path })) => Some(ffmpeg.video_info(path)?.duration),
        (None, _) => None,
      };

      ffmpeg.execute(&arguments, "build video", expected_duration)
    });

    let elapsed = start.elapsed().as_secs_f64();

    match &result {
      Ok(()) => log::info!("video built in {elapsed:.2}s: {context}"),
      Err(err) => log::error!("error rendering video after {elapsed:.2}s: {err}: {context}"),
    }

    result
  }
}

// Quotes paths that would otherwise be split by the filtergraph parser.
fn filter_path(path: &Utf8Path) -> String {
  if path
    .as_str()
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '_' | '-'))
  {
    path.to_string()
  } else {
    format!("'{}'", path.as_str().replace('\'', r"'\''"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Fake {
    audio: f64,
    video: f64,
  }

  impl Probe for Fake {
    fn audio_info(&self, _path: &Utf8Path) -> Result<AudioInfo> {
      Ok(AudioInfo {
        duration: self.audio,
        channels: 2,
      })
    }

    fn video_info(&self, _path: &Utf8Path) -> Result<VideoInfo> {
      Ok(VideoInfo {
        duration: self.video,
        width: Some(1920),
        height: Some(1080),
      })
    }
  }

  const PROBE: Fake = Fake {
    audio: 10.5,
    video: 30.0,
  };

  fn composition() -> Composition {
    Composition::new(Dimensions::new(1080, 1920)).output("out.mp4")
  }

  #[test]
  fn image_with_audio_and_subtitles() {
    assert_eq!(
      composition()
        .background_image("bg.jpg", KenBurns::default())
        .audio("voice.mp3")
        .subtitles("captions.ass")
        .command(&PROBE)
        .unwrap(),
      [
        "-y",
        "-loop",
        "1",
        "-t",
        "10.5",
        "-i",
        "bg.jpg",
        "-i",
        "voice.mp3",
        "-filter_complex",
        "[0]scale=1080:-2,setsar=1:1,crop=1080:1920,zoompan=z='zoom+0.001':x=0:y=0:d=263:s=1080x1920:fps=25[bg];[bg]subtitles=captions.ass[v]",
        "-map",
        "[v]",
        "-map",
        "1:a",
        "-c:v",
        "libx264",
        "-preset",
        "ultrafast",
        "-crf",
        "23",
        "-pix_fmt",
        "yuv420p",
        "-c:a",
        "aac",
        "-b:a",
        "192k",
        "-t",
        "10.5",
        "out.mp4",
      ],
    );
  }

  #[test]
  fn video_with_audio_loops_background() {
    let arguments = composition()
      .background_video("loop.mp4")
      .audio("voice.mp3")
      .command(&PROBE)
      .unwrap();

    assert_eq!(
      arguments[..12],
      [
        "-y",
        "-stream_loop",
        "-1",
        "-t",
        "10.5",
        "-i",
        "loop.mp4",
        "-i",
        "voice.mp3",
        "-filter_complex",
        "[0]scale=1080:1920[bg];[bg]copy[v]",
        "-map",
      ],
    );
  }

  #[test]
  fn video_with_subtitles_only() {
    assert_eq!(
      composition()
        .background_video("clip.mp4")
        .subtitles("captions.ass")
        .command(&PROBE)
        .unwrap(),
      [
        "-y",
        "-i",
        "clip.mp4",
        "-filter_complex",
        "[0]scale=1080:1920[bg];[bg]subtitles=captions.ass[v]",
        "-map",
        "[v]",
        "-c:v",
        "libx264",
        "-preset",
        "ultrafast",
        "-crf",
        "23",
        "-pix_fmt",
        "yuv420p",
        "out.mp4",
      ],
    );
  }

  #[test]
  fn integral_duration_keeps_fraction() {
    let arguments = composition()
      .background_image(
        "bg.jpg",
        KenBurns {
          zoom_factor: 1.0,
          ..KenBurns::default()
        },
      )
      .audio("voice.mp3")
      .command(&Fake {
        audio: 10.0,
        video: 0.0,
      })
      .unwrap();

    assert_eq!(arguments[1..7], ["-loop", "1", "-t", "10.0", "-i", "bg.jpg"]);

    assert_eq!(
      arguments[10],
      "[0]scale=1080:-2,setsar=1:1,crop=1080:1920,zoompan=z='zoom+1.0':x=0:y=0:d=251:s=1080x1920:fps=25[bg];[bg]copy[v]",
    );

    assert_eq!(arguments[arguments.len() - 3..], ["-t", "10.0", "out.mp4"]);
  }

  #[test]
  fn default_output() {
    let arguments = Composition::new(Dimensions::new(10, 10))
      .background_video("clip.mp4")
      .subtitles("captions.ass")
      .command(&PROBE)
      .unwrap();

    assert_eq!(arguments.last().unwrap(), "output.mp4");
  }

  #[test]
  fn validation() {
    assert_matches!(
      composition().audio("voice.mp3").command(&PROBE).unwrap_err(),
      Error::BackgroundMissing { .. },
    );

    assert_matches!(
      composition()
        .background_video("clip.mp4")
        .command(&PROBE)
        .unwrap_err(),
      Error::ContentMissing { .. },
    );

    assert_matches!(
      composition()
        .background_image("bg.jpg", KenBurns::default())
        .subtitles("captions.ass")
        .command(&PROBE)
        .unwrap_err(),
      Error::AudioRequired { path, .. } if path == "bg.jpg",
    );

    assert_matches!(
      composition()
        .background_image("bg.jpg", KenBurns::default())
        .audio("silence.mp3")
        .command(&Fake {
          audio: 0.0,
          video: 0.0,
        })
        .unwrap_err(),
      Error::AudioDuration { path, .. } if path == "silence.mp3",
    );
  }

  #[test]
  fn quoted_subtitle_path() {
    assert_eq!(filter_path(Utf8Path::new("dir/captions.ass")), "dir/captions.ass");
    assert_eq!(filter_path(Utf8Path::new("C:/my captions.ass")), "'C:/my captions.ass'");
    assert_eq!(filter_path(Utf8Path::new("it's.ass")), r"'it'\''s.ass'");
  }

  #[cfg(unix)]
  #[test]
  fn execute() {
    let _guard = processes();

    let tempdir = tempdir();

    let ffmpeg = Ffmpeg {
      ffmpeg: script(
        &tempdir,
        "ffmpeg",
        "printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/arguments\"",
      ),
      ffprobe: script(
        &tempdir,
        "ffprobe",
        r#"echo '{"streams": [{"width": 1920, "height": 1080}], "format": {"duration": "7.25"}}'"#,
      ),
    };

    composition()
      .background_video("clip.mp4")
      .subtitles("captions.ass")
      .execute(&ffmpeg)
      .unwrap();

    let arguments = fs::read_to_string(tempdir.path_utf8().join("arguments")).unwrap();

    assert!(arguments.starts_with("-y\n-i\nclip.mp4\n"), "{arguments}");
  }

  #[test]
  fn execute_invalid() {
    assert_matches!(
      composition().execute(&Ffmpeg::default()).unwrap_err(),
      Error::BackgroundMissing { .. },
    );
  }
}
