use anyhow::anyhow;

/// The deepest fan-out the parallel sorter accepts. Deeper trees issue more tasks than any pool
/// can use.
pub(crate) const MAX_FAN_OUT_DEPTH: usize = 12;

#[derive(Clone, Debug)]
pub(crate) struct Config {
    tasks: usize,
    fan_out_depth: usize,
    queue_size: usize,
    max_key_length: Option<usize>,
}

impl Config {
    pub(crate) fn new(
        tasks: usize,
        fan_out_depth: usize,
        queue_size: Option<usize>,
        max_key_length: Option<usize>,
    ) -> Result<Config, anyhow::Error> {
        if tasks == 0 {
            return Err(anyhow!("The number of tasks must be positive"));
        }

        let queue_size = queue_size
            .unwrap_or_else(|| max_dispatched_tasks(fan_out_depth.min(MAX_FAN_OUT_DEPTH)).max(1));
        check_fan_out_depth(fan_out_depth, queue_size)?;

        if max_key_length == Some(0) {
            return Err(anyhow!("Max key length must be positive"));
        }

        Ok(
            Config {
                tasks,
                fan_out_depth,
                queue_size,
                max_key_length,
            }
        )
    }

    pub(crate) fn tasks(&self) -> usize {
        self.tasks
    }

    pub(crate) fn fan_out_depth(&self) -> usize {
        self.fan_out_depth
    }

    pub(crate) fn queue_size(&self) -> usize {
        self.queue_size
    }

    pub(crate) fn max_key_length(&self) -> Option<usize> {
        self.max_key_length
    }
}

/// Fails when `fan_out_depth` is above the cap or when a pool queue of `queue_size` cannot hold
/// every task a sort at that depth may issue.
pub(crate) fn check_fan_out_depth(fan_out_depth: usize, queue_size: usize) -> Result<(), anyhow::Error> {
    if fan_out_depth > MAX_FAN_OUT_DEPTH {
        return Err(
            anyhow!(
                "Fan-out depth {} exceeds the maximum of {}",
                fan_out_depth,
                MAX_FAN_OUT_DEPTH,
            )
        );
    }

    let required = max_dispatched_tasks(fan_out_depth);
    if queue_size < required {
        return Err(
            anyhow!(
                "Queue size {} cannot hold the {} tasks a fan-out depth of {} may issue",
                queue_size,
                required,
                fan_out_depth,
            )
        );
    }
    Ok(())
}

/// Upper bound of the tasks one sort may submit: calls at tree depths `1..=fan_out_depth` each
/// submit at most three children, `3 + 9 + ... + 3^fan_out_depth`.
pub(crate) fn max_dispatched_tasks(fan_out_depth: usize) -> usize {
    (3usize.pow(fan_out_depth as u32 + 1) - 3) / 2
}

#[cfg(test)]
mod tests {
    use crate::config::{check_fan_out_depth, max_dispatched_tasks, Config, MAX_FAN_OUT_DEPTH};

    #[test]
    fn test_max_dispatched_tasks() {
        assert_eq!(max_dispatched_tasks(0), 0);
        assert_eq!(max_dispatched_tasks(1), 3);
        assert_eq!(max_dispatched_tasks(2), 12);
        assert_eq!(max_dispatched_tasks(8), 9840);
    }

    #[test]
    fn test_default_queue_size_fits_all_tasks() -> Result<(), anyhow::Error> {
        let config = Config::new(4, 8, None, None)?;
        assert_eq!(config.queue_size(), 9840);
        assert_eq!(config.tasks(), 4);
        assert_eq!(config.fan_out_depth(), 8);
        assert_eq!(config.max_key_length(), None);
        Ok(())
    }

    #[test]
    fn test_small_queue_is_rejected() {
        assert!(Config::new(4, 3, Some(38), None).is_err());
        assert!(Config::new(4, 3, Some(39), None).is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        assert!(Config::new(0, 8, None, None).is_err());
        assert!(Config::new(4, MAX_FAN_OUT_DEPTH + 1, None, None).is_err());
        assert!(Config::new(4, 8, None, Some(0)).is_err());
    }

    #[test]
    fn test_check_fan_out_depth() {
        assert!(check_fan_out_depth(8, 9840).is_ok());
        assert!(check_fan_out_depth(9, 9840).is_err());
        assert!(check_fan_out_depth(0, 1).is_ok());
        assert!(check_fan_out_depth(MAX_FAN_OUT_DEPTH + 1, usize::MAX).is_err());
    }
}
