use super::*;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Recipe {
  pub(crate) dimensions: Dimensions,
  pub(crate) background: Background,
  #[serde(default)]
  pub(crate) audio: Option<Utf8PathBuf>,
  #[serde(default)]
  pub(crate) captions: Option<Captions>,
  #[serde(default = "Recipe::default_output")]
  pub(crate) output: Utf8PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub(crate) enum Captions {
  Subtitles {
    path: Utf8PathBuf,
  },
  Words {
    path: Utf8PathBuf,
    #[serde(default = "Captions::default_max_length")]
    max_length: usize,
    #[serde(default = "Captions::default_lines")]
    lines: usize,
    #[serde(default)]
    style: SubtitleStyle,
  },
}

impl Captions {
  fn default_max_length() -> usize {
    caption::MAX_LENGTH
  }

  fn default_lines() -> usize {
    caption::LINES
  }
}

impl Recipe {
  fn default_output() -> Utf8PathBuf {
    "output.mp4".into()
  }

  pub(crate) fn load(path: &Utf8Path) -> Result<Self> {
    let yaml = fs::read_to_string(path).context(error::Io { path })?;

    let mut recipe = serde_yaml::from_str::<Self>(&yaml).context(error::DeserializeRecipe { path })?;

    if let Some(root) = path.parent() {
      recipe.resolve(root);
    }

    Ok(recipe)
  }

  fn resolve(&mut self, root: &Utf8Path) {
    let resolve = |path: &mut Utf8PathBuf| *path = root.join(&*path);

    match &mut self.background {
      Background::Image { path, .. } | Background::Video { path } => resolve(path),
    }

    if let Some(audio) = &mut self.audio {
      resolve(audio);
    }

    match &mut self.captions {
      Some(Captions::Subtitles { path } | Captions::Words { path, .. }) => resolve(path),
      None => {}
    }

    resolve(&mut self.output);
  }

  // Word captions are written into `scratch`, which must outlive the render.
  pub(crate) fn composition(&self, scratch: &Utf8Path) -> Result<Composition> {
    let composition = Composition::new(self.dimensions);

    let mut composition = match &self.background {
      Background::Image { path, ken_burns } => composition.background_image(path, *ken_burns),
      Background::Video { path } => composition.background_video(path),
    }
    .output(&self.output);

    if let Some(audio) = &self.audio {
      composition = composition.audio(audio);
    }

    match &self.captions {
      Some(Captions::Subtitles { path }) => {
        composition = composition.subtitles(path);
      }
      Some(Captions::Words {
        path,
        max_length,
        lines,
        style,
      }) => {
        let words = Word::load(path)?;

        let segments = caption::segments(&words, *max_length, *lines);

        log::info!(
          "split {} words from `{path}` into {} caption segments",
          words.len(),
          segments.len(),
        );

        let subtitles = scratch.join("captions.ass");

        style.write(&segments, self.dimensions, &subtitles)?;

        composition = composition.subtitles(subtitles);
      }
      None => {}
    }

    Ok(composition)
  }
}
