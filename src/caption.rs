use super::*;

const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

// Gap inserted between consecutive segments so they never overlap on screen.
const GAP: f64 = 0.05;

pub(crate) const MAX_LENGTH: usize = 80;

pub(crate) const LINES: usize = 2;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct Word {
  pub(crate) text: String,
  pub(crate) start_ts: f64,
  pub(crate) end_ts: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Segment {
  pub(crate) lines: Vec<String>,
  pub(crate) start: f64,
  pub(crate) end: f64,
}

impl Word {
  pub(crate) fn load(path: &Utf8Path) -> Result<Vec<Self>> {
    let json = fs::read_to_string(path).context(error::Io { path })?;
    serde_json::from_str(&json).context(error::DeserializeWords { path })
  }

  // Substring match: `-.` and the empty string count, but `...` does not.
  fn is_punctuation(&self) -> bool {
    PUNCTUATION.contains(self.text.as_str())
  }
}

pub(crate) fn segments(words: &[Word], max_length: usize, lines: usize) -> Vec<Segment> {
  let Some(first) = words.first() else {
    return Vec::new();
  };

  let lines = lines.max(1);

  let mut segments = Vec::new();
  let mut current = vec![String::new(); lines];
  let mut line = 0;
  let mut start = first.start_ts;
  let mut end = first.end_ts;

  for word in words {
    end = word.end_ts;

    if word.is_punctuation() {
      if !current[line].is_empty() {
        current[line].push_str(&word.text);
      }
      continue;
    }

    if current[line].chars().count() + word.text.chars().count() > max_length {
      line += 1;
    }

    if line >= lines {
      segments.push(Segment {
        lines: std::mem::replace(&mut current, vec![String::new(); lines]),
        start,
        end,
      });
      line = 0;
      start = word.start_ts + GAP;
    }

    if !current[line].is_empty() {
      current[line].push(' ');
    }

    current[line].push_str(&word.text);
  }

  if current.iter().any(|line| !line.is_empty()) {
    segments.push(Segment {
      lines: current,
      start,
      end,
    });
  }

  for i in 1..segments.len() {
    let next = segments[i].start;
    let previous = &mut segments[i - 1];
    if previous.end >= next {
      previous.end = next - GAP;
    }
  }

  segments
}
