use std::ops::Range;
use std::sync::Arc;

use command_executor::command::Command;

use crate::countdown::Pending;
use crate::parallel::SortContext;

/// A sub-problem of one parallel sort: a range of the keys, the byte position to partition on
/// and the number of dispatch decisions above it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SortTask {
    range: Range<usize>,
    depth: usize,
    tree_depth: usize,
}

impl SortTask {
    pub(crate) fn root(len: usize) -> SortTask {
        SortTask {
            range: 0..len,
            depth: 0,
            tree_depth: 1,
        }
    }

    /// A task for the zone `bounds` of this task's range, relative to its start.
    pub(crate) fn child(&self, bounds: (usize, usize), depth: usize) -> SortTask {
        let (start, end) = bounds;
        SortTask {
            range: self.range.start + start..self.range.start + end,
            depth,
            tree_depth: self.tree_depth + 1,
        }
    }

    pub(crate) fn range(&self) -> &Range<usize> {
        &self.range
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn tree_depth(&self) -> usize {
        self.tree_depth
    }
}

pub(crate) struct SortCommand<K> {
    task: SortTask,
    context: Arc<SortContext<K>>,
    // fields drop in order, the context is released before the pending unit is signaled
    _pending: Pending,
}

impl<K> SortCommand<K> {
    pub(crate) fn new(task: SortTask, context: Arc<SortContext<K>>, pending: Pending) -> SortCommand<K> {
        SortCommand {
            task,
            context,
            _pending: pending,
        }
    }
}

impl<K: AsRef<[u8]> + Send + 'static> Command for SortCommand<K> {
    fn execute(&self) -> Result<(), anyhow::Error> {
        if let Err(e) = self.context.perform_sort(&self.task) {
            // surfaced to the caller once the sort completes
            self.context.record_error(e);
        }
        Ok(())
    }
}
