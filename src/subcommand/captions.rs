use super::*;

#[derive(Debug, Parser)]
pub struct Captions {
  #[arg(long, help = "Read timed words from JSON file <WORDS>.")]
  words: Utf8PathBuf,
  #[arg(long, help = "Size subtitles for a <DIMENSIONS> frame, e.g. `1080x1920`.")]
  dimensions: Dimensions,
  #[arg(long, help = "Write ASS subtitles to <OUTPUT>.")]
  output: Utf8PathBuf,
  #[arg(
    long,
    default_value_t = caption::MAX_LENGTH,
    help = "Wrap lines longer than <MAX_LENGTH> characters."
  )]
  max_length: usize,
  #[arg(
    long,
    default_value_t = caption::LINES,
    help = "Show at most <LINES> lines at once."
  )]
  lines: usize,
  #[command(flatten)]
  style: SubtitleStyle,
}

impl Captions {
  pub fn run(self) -> Result {
    let words = Word::load(&self.words)?;

    let segments = caption::segments(&words, self.max_length, self.lines);

    self.style.write(&segments, self.dimensions, &self.output)?;

    log::info!(
      "wrote {} caption segments from {} words to `{}`",
      segments.len(),
      words.len(),
      self.output,
    );

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn run() {
    let tempdir = tempdir();

    let root = tempdir.path_utf8();

    fs::write(
      root.join("words.json"),
      r#"[
        {"text": "Hello", "start_ts": 0.0, "end_ts": 0.4},
        {"text": "there", "start_ts": 0.4, "end_ts": 0.9},
        {"text": "!", "start_ts": 0.9, "end_ts": 1.0}
      ]"#,
    )
    .unwrap();

    let Subcommand::Captions(captions) = Subcommand::try_parse_from([
      "montage",
      "captions",
      "--words",
      root.join("words.json").as_str(),
      "--dimensions",
      "1080x1920",
      "--output",
      root.join("captions.ass").as_str(),
      "--font-size",
      "48",
      "--shadow-blur",
      "2",
    ])
    .unwrap() else {
      panic!("expected captions subcommand");
    };

    assert_eq!(captions.style.font_size, 48);

    captions.run().unwrap();

    let ass = fs::read_to_string(root.join("captions.ass")).unwrap();

    assert!(ass.contains("PlayResX: 1080\nPlayResY: 1920\n"));
    assert!(ass.contains(
      "Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\pos(540,768)\\1c&H00000000\\3c&H00000000\\4c&H00000000\\blur2}Hello there!\n"
    ));
    assert!(ass.ends_with(
      "Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\pos(540,768)}Hello there!\n"
    ));
  }

  #[test]
  fn invalid_dimensions() {
    assert!(Subcommand::try_parse_from([
      "montage",
      "captions",
      "--words",
      "words.json",
      "--dimensions",
      "wide",
      "--output",
      "captions.ass",
    ])
    .is_err());
  }
}
