use {super::*, crate::ffmpeg::Music};

const EXTENSIONS: &[&str] = &["avi", "m4v", "mkv", "mov", "mp4", "webm"];

#[derive(Debug, Parser)]
pub struct Merge {
  #[arg(long, help = "Write merged video to <OUTPUT>.")]
  output: Utf8PathBuf,
  #[arg(long, help = "Mix <MUSIC> under the merged audio.")]
  music: Option<Utf8PathBuf>,
  #[arg(
    long,
    default_value_t = 0.5,
    help = "Play background music at <MUSIC_VOLUME>, from 0.0 to 1.0."
  )]
  music_volume: f64,
  #[arg(long, help = "Append videos found in <DIRECTORY>, sorted by path.")]
  directory: Option<Utf8PathBuf>,
  #[arg(help = "Merge <VIDEOS> in order.")]
  videos: Vec<Utf8PathBuf>,
  #[command(flatten)]
  ffmpeg: Ffmpeg,
}

impl Merge {
  pub fn run(self) -> Result {
    let videos = self.videos()?;

    let music = self.music.clone().map(|path| Music {
      path,
      volume: self.music_volume,
    });

    self.ffmpeg.merge(&videos, &self.output, music.as_ref())
  }

  fn videos(&self) -> Result<Vec<Utf8PathBuf>> {
    let mut videos = self.videos.clone();

    if let Some(directory) = &self.directory {
      let mut found = Vec::new();

      for result in WalkDir::new(directory) {
        let entry = result.context(error::WalkDir { root: directory })?;

        if !entry.file_type().is_file() {
          continue;
        }

        let path = entry.into_path().try_into_utf8()?;

        let video = path
          .extension()
          .map(|extension| EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()))
          .unwrap_or_default();

        if video {
          found.push(path);
        }
      }

      found.sort();

      log::debug!("found {} videos in `{directory}`", found.len());

      videos.extend(found);
    }

    Ok(videos)
  }
}
