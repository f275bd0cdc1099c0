use super::*;

#[derive(Debug, Parser)]
pub struct Render {
  #[arg(long, help = "Render video described by YAML <RECIPE>.")]
  recipe: Utf8PathBuf,
  #[command(flatten)]
  ffmpeg: Ffmpeg,
}

impl Render {
  pub fn run(self) -> Result {
    let recipe = Recipe::load(&self.recipe)?;

    let scratch = tempfile::tempdir().context(error::TempDir)?;

    let composition = recipe.composition(scratch.path().try_into_utf8()?)?;

    composition.execute(&self.ffmpeg)
  }
}
