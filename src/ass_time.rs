use super::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AssTime(pub(crate) f64);

impl Display for AssTime {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let seconds = if self.0.is_finite() && self.0 > 0.0 {
      self.0
    } else {
      0.0
    };

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centiseconds = ((seconds % 1.0) * 100.0) as u64;

    write!(f, "{hours}:{minutes:02}:{secs:02}.{centiseconds:02}")
  }
}
