use super::*;

#[derive(Clone, Copy, Debug, Default, Deserialize, EnumDisplay, EnumString, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum ZoomDirection {
  ZoomToCenter,
  ZoomToTop,
  #[default]
  ZoomToTopLeft,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct KenBurns {
  pub(crate) direction: ZoomDirection,
  pub(crate) zoom_factor: f64,
}

impl Default for KenBurns {
  fn default() -> Self {
    Self {
      direction: ZoomDirection::default(),
      zoom_factor: 0.001,
    }
  }
}

impl KenBurns {
  pub(crate) const FPS: u32 = 25;

  pub(crate) fn expression(self) -> String {
    let zoom = format!("z='zoom+{:?}'", self.zoom_factor);

    match self.direction {
      ZoomDirection::ZoomToCenter => format!("{zoom}:x=iw/2-(iw/zoom/2):y=ih/2-(ih/zoom/2)"),
      ZoomDirection::ZoomToTop => format!("{zoom}:x=iw/2-(iw/zoom/2):y=0"),
      ZoomDirection::ZoomToTopLeft => format!("{zoom}:x=0:y=0"),
    }
  }

  pub(crate) fn filter(self, dimensions: Dimensions, duration: f64) -> String {
    let Dimensions { width, height } = dimensions;
    let frames = (duration * f64::from(Self::FPS)).floor() as u64 + 1;
    format!(
      "[0]scale={width}:-2,setsar=1:1,crop={width}:{height},zoompan={}:d={frames}:s={width}x{height}:fps={}[bg]",
      self.expression(),
      Self::FPS,
    )
  }
}
