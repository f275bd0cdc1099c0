use {super::*, std::fmt::Write};

#[derive(Clone, Debug, Deserialize, PartialEq, clap::Args)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SubtitleStyle {
  #[arg(
    long,
    default_value_t = 0.4,
    help = "Place captions <POSITION_FROM_TOP> of the way down the frame."
  )]
  pub(crate) position_from_top: f64,
  #[arg(long, default_value_t = 24, help = "Render captions at <FONT_SIZE>.")]
  pub(crate) font_size: u32,
  #[arg(long, default_value = "&H00FFFFFF", help = "Fill captions with ASS colour <FONT_COLOR>.")]
  pub(crate) font_color: String,
  #[arg(long, default_value = "&H80000000", help = "Draw drop shadow in ASS colour <SHADOW_COLOR>.")]
  pub(crate) shadow_color: String,
  #[arg(long, default_value_t = 0.0, help = "Blur drop shadow by <SHADOW_BLUR>, 0 disables it.")]
  pub(crate) shadow_blur: f64,
  #[arg(long, default_value = "&H00000000", help = "Outline captions in ASS colour <STROKE_COLOR>.")]
  pub(crate) stroke_color: String,
  #[arg(long, default_value_t = 0.0, help = "Outline captions <STROKE_SIZE> pixels wide.")]
  pub(crate) stroke_size: f64,
}

impl Default for SubtitleStyle {
  fn default() -> Self {
    Self {
      position_from_top: 0.4,
      font_size: 24,
      font_color: "&H00FFFFFF".into(),
      shadow_color: "&H80000000".into(),
      shadow_blur: 0.0,
      stroke_color: "&H00000000".into(),
      stroke_size: 0.0,
    }
  }
}

impl SubtitleStyle {
  pub(crate) fn render(&self, segments: &[Segment], dimensions: Dimensions) -> String {
    let Dimensions { width, height } = dimensions;

    let mut ass = format!(
      "[Script Info]
ScriptType: v4.00+
PlayResX: {width}
PlayResY: {height}

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,{},{},&H000000FF,{},&H00000000,-1,0,0,0,100,100,0,0,1,{},0,8,20,20,20,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
",
      self.font_size, self.font_color, self.stroke_color, self.stroke_size,
    );

    let x = (f64::from(width) / 2.0) as i64;
    let y = (f64::from(height) * self.position_from_top) as i64;

    for segment in segments {
      let start = AssTime(segment.start);
      let end = AssTime(segment.end);

      let mut text = String::new();
      for (i, line) in segment.lines.iter().enumerate() {
        if line.is_empty() {
          continue;
        }
        if i > 0 {
          text.push_str("\\N");
        }
        text.push_str(line);
      }

      // shadow goes first so it is drawn underneath
      if self.shadow_blur > 0.0 {
        let shadow = self.shadow_color.replace("&H80", "&H00");
        writeln!(
          ass,
          "Dialogue: 0,{start},{end},Default,,0,0,0,,{{\\pos({x},{y})\\1c{shadow}\\3c&H00000000\\4c&H00000000\\blur{}}}{text}",
          self.shadow_blur,
        )
        .unwrap();
      }

      writeln!(
        ass,
        "Dialogue: 0,{start},{end},Default,,0,0,0,,{{\\pos({x},{y})}}{text}"
      )
      .unwrap();
    }

    ass
  }

  pub(crate) fn write(
    &self,
    segments: &[Segment],
    dimensions: Dimensions,
    path: &Utf8Path,
  ) -> Result {
    fs::write(path, self.render(segments, dimensions)).context(error::Io { path })?;

    log::debug!(
      "wrote ASS subtitles: path={path} segments={} shadow={}",
      segments.len(),
      self.shadow_blur > 0.0,
    );

    Ok(())
  }
}
