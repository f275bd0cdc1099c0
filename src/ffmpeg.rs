use super::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Music {
  pub(crate) path: Utf8PathBuf,
  pub(crate) volume: f64,
}

#[derive(Clone, Debug, clap::Args)]
pub(crate) struct Ffmpeg {
  #[arg(
    long,
    default_value = "ffmpeg",
    help = "Encode with <FFMPEG> executable."
  )]
  pub(crate) ffmpeg: Utf8PathBuf,
  #[arg(
    long,
    default_value = "ffprobe",
    help = "Inspect media with <FFPROBE> executable."
  )]
  pub(crate) ffprobe: Utf8PathBuf,
}

impl Default for Ffmpeg {
  fn default() -> Self {
    Self {
      ffmpeg: "ffmpeg".into(),
      ffprobe: "ffprobe".into(),
    }
  }
}

impl Ffmpeg {
  // Used when the first clip reports no dimensions.
  const FALLBACK_DIMENSIONS: Dimensions = Dimensions {
    width: 1080,
    height: 1920,
  };

  pub(crate) fn execute(
    &self,
    arguments: &[String],
    operation: &str,
    expected_duration: Option<f64>,
  ) -> Result {
    log::debug!(
      "executing ffmpeg for {operation}: {} {}",
      self.ffmpeg,
      arguments.join(" "),
    );

    let mut child = Command::new(&self.ffmpeg)
      .args(arguments)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::piped())
      .spawn()
      .context(error::Spawn {
        program: &self.ffmpeg,
      })?;

    let last = match child.stderr.take() {
      Some(stderr) => match self.stream(stderr, operation, expected_duration) {
        Ok(last) => last,
        Err(err) => {
          child.kill().ok();
          child.wait().ok();
          return Err(err);
        }
      },
      None => None,
    };

    let status = child.wait().context(error::Spawn {
      program: &self.ffmpeg,
    })?;

    if !status.success() {
      log::error!(
        "ffmpeg exited with {status} for {operation}{}",
        last
          .map(|message| format!(": {message}"))
          .unwrap_or_default(),
      );
      return error::FfmpegStatus { operation, status }.fail();
    }

    log::debug!("{operation} completed successfully");

    Ok(())
  }

  fn stream(
    &self,
    stderr: impl io::Read,
    operation: &str,
    expected_duration: Option<f64>,
  ) -> Result<Option<String>> {
    let mut last = None;

    // ffmpeg redraws its status line with carriage returns
    for chunk in BufReader::new(stderr).split(b'\r') {
      let chunk = chunk.context(error::Spawn {
        program: &self.ffmpeg,
      })?;

      for line in String::from_utf8_lossy(&chunk).lines() {
        match progress::classify(line, expected_duration) {
          Line::Progress { percent, time } => log::info!(
            "{operation}: {percent:.2}% complete (time: {time} / total: {})",
            progress::clock(expected_duration.unwrap_or_default()),
          ),
          Line::Noise => {}
          Line::Message(message) => {
            log::debug!("ffmpeg: {message}");
            last = Some(message);
          }
        }
      }
    }

    Ok(last)
  }

  fn ffprobe(&self, path: &Utf8Path, selector: &str) -> Result<String> {
    log::debug!("probing `{path}` for stream {selector}");

    let output = Command::new(&self.ffprobe)
      .args([
        "-v",
        "quiet",
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
        "-select_streams",
        selector,
      ])
      .arg(path)
      .stdin(Stdio::null())
      .output()
      .context(error::Spawn {
        program: &self.ffprobe,
      })?;

    if !output.status.success() {
      return error::FfprobeStatus {
        path,
        stderr: String::from_utf8_lossy(&output.stderr).trim(),
      }
      .fail();
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }

  pub(crate) fn merge(
    &self,
    videos: &[Utf8PathBuf],
    output: &Utf8Path,
    music: Option<&Music>,
  ) -> Result {
    let first = videos.first().context(error::MergeEmpty)?;

    let start = Instant::now();

    let info = self.video_info(first)?;

    let target = match (info.width, info.height) {
      (Some(width), Some(height)) => Dimensions::new(width, height),
      _ => Self::FALLBACK_DIMENSIONS,
    };

    log::debug!(
      "merging {} videos into `{output}`: target={target} music={}",
      videos.len(),
      music.is_some(),
    );

    let mut expected_duration = info.duration;
    for video in &videos[1..] {
      expected_duration += self.video_info(video)?.duration;
    }

    self.execute(
      &Self::merge_arguments(videos, output, music, target),
      "merge videos",
      Some(expected_duration),
    )?;

    log::info!(
      "merged {} videos into `{output}` in {:.2}s",
      videos.len(),
      start.elapsed().as_secs_f64(),
    );

    Ok(())
  }

  pub(crate) fn merge_arguments(
    videos: &[Utf8PathBuf],
    output: &Utf8Path,
    music: Option<&Music>,
    target: Dimensions,
  ) -> Vec<String> {
    let mut arguments = vec!["-y".to_string()];

    for video in videos {
      arguments.extend(["-i".into(), video.to_string()]);
    }

    if let Some(music) = music {
      arguments.extend(["-i".into(), music.path.to_string()]);
    }

    let music_input = videos.len();

    let size = format!("{}:{}", target.width, target.height);

    let normalize = format!(
      "scale={size}:force_original_aspect_ratio=decrease,pad={size}:(ow-iw)/2:(oh-ih)/2:black,fps=30"
    );

    let (filter, audio) = if videos.len() == 1 {
      match music {
        Some(music) => (
          format!(
            "[0:v]{normalize}[v];[{music_input}:a]volume={:?}[bg];[0:a][bg]amix=inputs=2:duration=first[a]",
            music.volume,
          ),
          "[a]",
        ),
        None => (format!("[0:v]{normalize}[v]"), "0:a"),
      }
    } else {
      let mut filter = (0..videos.len())
        .map(|i| format!("[{i}:v]{normalize},format=yuv420p[v{i}n]"))
        .collect::<Vec<String>>()
        .join(";");

      filter.push(';');

      for i in 0..videos.len() {
        filter.push_str(&format!("[v{i}n][{i}:a]"));
      }

      filter.push_str(&format!("concat=n={}:v=1:a=1[v][a]", videos.len()));

      match music {
        Some(music) => {
          filter.push_str(&format!(
            ";[{music_input}:a]volume={:?}[bg];[a][bg]amix=inputs=2:duration=first[final_a]",
            music.volume,
          ));
          (filter, "[final_a]")
        }
        None => (filter, "[a]"),
      }
    };

    arguments.extend(
      [
        "-filter_complex",
        filter.as_str(),
        "-map",
        "[v]",
        "-map",
        audio,
        "-c:v",
        "libx264",
        "-preset",
        "veryfast",
        "-crf",
        "23",
        "-c:a",
        "aac",
        "-b:a",
        "192k",
        "-pix_fmt",
        "yuv420p",
        output.as_str(),
      ]
      .map(String::from),
    );

    arguments
  }
}

impl Probe for Ffmpeg {
  fn audio_info(&self, path: &Utf8Path) -> Result<AudioInfo> {
    AudioInfo::parse(path, &self.ffprobe(path, AudioInfo::SELECTOR)?)
  }

  fn video_info(&self, path: &Utf8Path) -> Result<VideoInfo> {
    VideoInfo::parse(path, &self.ffprobe(path, VideoInfo::SELECTOR)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn videos(paths: &[&str]) -> Vec<Utf8PathBuf> {
    paths.iter().map(Utf8PathBuf::from).collect()
  }

  #[test]
  fn merge_single() {
    assert_eq!(
      Ffmpeg::merge_arguments(
        &videos(&["a.mp4"]),
        Utf8Path::new("out.mp4"),
        None,
        Dimensions::new(1080, 1920),
      ),
      [
        "-y",
        "-i",
        "a.mp4",
        "-filter_complex",
        "[0:v]scale=1080:1920:force_original_aspect_ratio=decrease,pad=1080:1920:(ow-iw)/2:(oh-ih)/2:black,fps=30[v]",
        "-map",
        "[v]",
        "-map",
        "0:a",
        "-c:v",
        "libx264",
        "-preset",
        "veryfast",
        "-crf",
        "23",
        "-c:a",
        "aac",
        "-b:a",
        "192k",
        "-pix_fmt",
        "yuv420p",
        "out.mp4",
      ],
    );
  }

  #[test]
  fn merge_single_with_music() {
    let arguments = Ffmpeg::merge_arguments(
      &videos(&["a.mp4"]),
      Utf8Path::new("out.mp4"),
      Some(&Music {
        path: "song.mp3".into(),
        volume: 0.25,
      }),
      Dimensions::new(720, 1280),
    );

    assert_eq!(arguments[1..5], ["-i", "a.mp4", "-i", "song.mp3"]);
    assert_eq!(
      arguments[6],
      "[0:v]scale=720:1280:force_original_aspect_ratio=decrease,pad=720:1280:(ow-iw)/2:(oh-ih)/2:black,fps=30[v];[1:a]volume=0.25[bg];[0:a][bg]amix=inputs=2:duration=first[a]",
    );
    assert_eq!(arguments[7..11], ["-map", "[v]", "-map", "[a]"]);
  }

  #[test]
  fn integral_music_volume() {
    let arguments = Ffmpeg::merge_arguments(
      &videos(&["a.mp4"]),
      Utf8Path::new("out.mp4"),
      Some(&Music {
        path: "song.mp3".into(),
        volume: 1.0,
      }),
      Dimensions::new(720, 1280),
    );

    assert!(arguments[6].contains("[1:a]volume=1.0[bg]"), "{}", arguments[6]);
  }

  #[test]
  fn merge_many_with_music() {
    let arguments = Ffmpeg::merge_arguments(
      &videos(&["a.mp4", "b.mp4"]),
      Utf8Path::new("out.mp4"),
      Some(&Music {
        path: "song.mp3".into(),
        volume: 0.5,
      }),
      Dimensions::new(100, 200),
    );

    let normalize = "scale=100:200:force_original_aspect_ratio=decrease,pad=100:200:(ow-iw)/2:(oh-ih)/2:black,fps=30,format=yuv420p";

    assert_eq!(
      arguments[8],
      format!(
        "[0:v]{normalize}[v0n];[1:v]{normalize}[v1n];[v0n][0:a][v1n][1:a]concat=n=2:v=1:a=1[v][a];[2:a]volume=0.5[bg];[a][bg]amix=inputs=2:duration=first[final_a]"
      ),
    );
    assert_eq!(arguments[9..13], ["-map", "[v]", "-map", "[final_a]"]);
    assert_eq!(arguments.last().unwrap(), "out.mp4");
  }

  #[test]
  fn merge_many_without_music() {
    let arguments = Ffmpeg::merge_arguments(
      &videos(&["a.mp4", "b.mp4", "c.mp4"]),
      Utf8Path::new("out.mp4"),
      None,
      Dimensions::new(100, 200),
    );

    assert!(arguments[8].ends_with("[v0n][0:a][v1n][1:a][v2n][2:a]concat=n=3:v=1:a=1[v][a]"));
    assert_eq!(arguments[9..13], ["-map", "[v]", "-map", "[a]"]);
  }

  struct Broken;

  impl io::Read for Broken {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
      Err(io::Error::other("stderr closed"))
    }
  }

  #[test]
  fn stream_keeps_last_message() {
    let last = Ffmpeg::default()
      .stream(
        io::Cursor::new("ffmpeg version 6.1\nframe=1 time=00:00:01.00 speed=1x\rout.mp4: No space left\n"),
        "test",
        Some(2.0),
      )
      .unwrap();

    assert_eq!(last.as_deref(), Some("out.mp4: No space left"));
  }

  #[test]
  fn stream_read_error() {
    assert_matches!(
      Ffmpeg::default().stream(Broken, "test", None).unwrap_err(),
      Error::Spawn { program, .. } if program == "ffmpeg",
    );
  }

  #[test]
  fn merge_empty() {
    assert_matches!(
      Ffmpeg::default()
        .merge(&[], Utf8Path::new("out.mp4"), None)
        .unwrap_err(),
      Error::MergeEmpty { .. },
    );
  }

  #[test]
  fn missing_program() {
    let _guard = processes();

    let tempdir = tempdir();

    let ffmpeg = Ffmpeg {
      ffmpeg: tempdir.path_utf8().join("missing-ffmpeg"),
      ffprobe: tempdir.path_utf8().join("missing-ffprobe"),
    };

    assert_matches!(
      ffmpeg.execute(&[], "test", None).unwrap_err(),
      Error::Spawn { program, .. } if program == ffmpeg.ffmpeg,
    );

    assert_matches!(
      ffmpeg.video_info(Utf8Path::new("clip.mp4")).unwrap_err(),
      Error::Spawn { program, .. } if program == ffmpeg.ffprobe,
    );
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
        "printf 'ffmpeg version 6.1\\nframe=1 time=00:00:01.00 bitrate=1 speed=1x\\rframe=2 time=00:00:02.00 bitrate=1 speed=1x\\n' >&2\n\
         printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/arguments\"",
      ),
      ffprobe: "ffprobe".into(),
    };

    ffmpeg
      .execute(&["-y".into(), "out.mp4".into()], "test", Some(2.0))
      .unwrap();

    assert_eq!(
      fs::read_to_string(tempdir.path_utf8().join("arguments")).unwrap(),
      "-y\nout.mp4\n",
    );
  }

  #[cfg(unix)]
  #[test]
  fn execute_failure() {
    let _guard = processes();

    let tempdir = tempdir();

    let ffmpeg = Ffmpeg {
      ffmpeg: script(&tempdir, "ffmpeg", "echo 'out.mp4: Permission denied' >&2\nexit 3"),
      ffprobe: "ffprobe".into(),
    };

    assert_matches!(
      ffmpeg.execute(&[], "build video", None).unwrap_err(),
      Error::FfmpegStatus { operation, status, .. }
      if operation == "build video" && status.code() == Some(3),
    );
  }

  #[cfg(unix)]
  #[test]
  fn probe() {
    let _guard = processes();

    let tempdir = tempdir();

    let ffmpeg = Ffmpeg {
      ffmpeg: "ffmpeg".into(),
      ffprobe: script(
        &tempdir,
        "ffprobe",
        r#"echo '{"streams": [{"width": 640, "height": 360, "channels": 1}], "format": {"duration": "4.000000"}}'"#,
      ),
    };

    assert_eq!(
      ffmpeg.video_info(Utf8Path::new("clip.mp4")).unwrap(),
      VideoInfo {
        duration: 4.0,
        width: Some(640),
        height: Some(360),
      },
    );

    assert_eq!(
      ffmpeg.audio_info(Utf8Path::new("clip.mp4")).unwrap(),
      AudioInfo {
        duration: 4.0,
        channels: 1,
      },
    );
  }

  #[cfg(unix)]
  #[test]
  fn probe_failure() {
    let _guard = processes();

    let tempdir = tempdir();

    let ffmpeg = Ffmpeg {
      ffmpeg: "ffmpeg".into(),
      ffprobe: script(&tempdir, "ffprobe", "echo 'clip.mp4: Invalid data' >&2\nexit 1"),
    };

    assert_matches!(
      ffmpeg.audio_info(Utf8Path::new("clip.mp4")).unwrap_err(),
      Error::FfprobeStatus { stderr, .. } if stderr == "clip.mp4: Invalid data",
    );
  }

  #[cfg(unix)]
  #[test]
  fn merge() {
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
        r#"echo '{"streams": [{"width": 320, "height": 240}], "format": {"duration": "1.5"}}'"#,
      ),
    };

    ffmpeg
      .merge(&videos(&["a.mp4", "b.mp4"]), Utf8Path::new("out.mp4"), None)
      .unwrap();

    let arguments = fs::read_to_string(tempdir.path_utf8().join("arguments")).unwrap();

    assert!(arguments.contains("scale=320:240:force_original_aspect_ratio=decrease"));
    assert!(arguments.ends_with("out.mp4\n"));
  }
}
