use super::*;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub(crate) enum Background {
  Image {
    path: Utf8PathBuf,
    #[serde(default)]
    ken_burns: KenBurns,
  },
  Video {
    path: Utf8PathBuf,
  },
}

impl Background {
  pub(crate) fn path(&self) -> &Utf8Path {
    match self {
      Self::Image { path, .. } | Self::Video { path } => path,
    }
  }

  pub(crate) fn ty(&self) -> &'static str {
    match self {
      Self::Image { .. } => "image",
      Self::Video { .. } => "video",
    }
  }
}
