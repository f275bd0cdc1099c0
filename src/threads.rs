use {super::*, std::env};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Threads {
  pub(crate) cores: usize,
  pub(crate) workers: usize,
}

impl Threads {
  const CPU_MAX: &'static str = "/sys/fs/cgroup/cpu.max";

  pub(crate) fn detect() -> Self {
    let host = std::thread::available_parallelism()
      .map(usize::from)
      .unwrap_or(1);

    let cpu_max = match fs::read_to_string(Self::CPU_MAX) {
      Ok(cpu_max) => Some(cpu_max),
      Err(err) => {
        log::info!("{} not readable ({err}), using host core count", Self::CPU_MAX);
        None
      }
    };

    let cores = Self::cores(cpu_max.as_deref(), host);

    Self {
      cores,
      workers: Self::workers(cores, env::var("NUM_THREADS").ok().as_deref()),
    }
  }

  fn cores(cpu_max: Option<&str>, host: usize) -> usize {
    let Some(cpu_max) = cpu_max else {
      return host;
    };

    let fields = cpu_max.split_whitespace().collect::<Vec<&str>>();

    let [quota, period] = fields.as_slice() else {
      log::warn!(
        "{} does not have two values, using host core count",
        Self::CPU_MAX
      );
      return host;
    };

    if *quota == "max" {
      log::info!("{} is unlimited, using host core count", Self::CPU_MAX);
      return host;
    }

    match (quota.parse::<usize>(), period.parse::<usize>()) {
      (Ok(quota), Ok(period)) if period > 0 => {
        let cores = (quota / period).max(1);
        log::info!("using {cores} cores from cgroup quota");
        cores
      }
      _ => {
        log::warn!("{} is malformed, using host core count", Self::CPU_MAX);
        host
      }
    }
  }

  fn workers(cores: usize, num_threads: Option<&str>) -> usize {
    if let Some(num_threads) = num_threads {
      match num_threads.trim().parse::<usize>() {
        Ok(workers) if workers > 0 => return workers,
        _ => log::warn!("ignoring invalid NUM_THREADS `{num_threads}`"),
      }
    }

    ((cores as f64 * 1.5) as usize).max(1)
  }
}
