use super::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Dimensions {
  pub(crate) width: u32,
  pub(crate) height: u32,
}

impl Dimensions {
  pub(crate) fn new(width: u32, height: u32) -> Self {
    Self { width, height }
  }
}

impl FromStr for Dimensions {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let (width, height) = s
      .split_once(['x', 'X'])
      .context(error::DimensionsFormat { input: s })?;

    let context = error::DimensionsInteger { input: s };

    let dimensions = Self {
      width: width.trim().parse().context(context)?,
      height: height.trim().parse().context(context)?,
    };

    ensure!(
      dimensions.width > 0 && dimensions.height > 0,
      error::DimensionsZero { input: s }
    );

    Ok(dimensions)
  }
}

impl Display for Dimensions {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

impl<'de> Deserialize<'de> for Dimensions {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Ok(DeserializeFromStr::<Self>::deserialize(deserializer)?.0)
  }
}
