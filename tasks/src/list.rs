//! In memory task list

use crate::task::Task;

/// Task number given by the user does not exist
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("OOPS!!! There is no task number {number}, the list has {len} task(s).")]
pub struct IndexError {
    /// 1 based, as typed by the user
    pub number: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl TaskList {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn add(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    fn check_index(&self, index: usize) -> Result<(), IndexError> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(IndexError {
                number: index + 1,
                len: self.tasks.len(),
            })
        }
    }

    /// Mark task done, return it and whether its status changed
    pub fn mark_done(&mut self, index: usize) -> Result<(&Task, bool), IndexError> {
        self.check_index(index)?;
        let task = &mut self.tasks[index];
        let changed = task.set_done();
        Ok((task, changed))
    }

    pub fn delete(&mut self, index: usize) -> Result<Task, IndexError> {
        self.check_index(index)?;
        Ok(self.tasks.remove(index))
    }

    /// Tasks whose description contains keyword, with their 1 based number
    pub fn find<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = (usize, &'a Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.description.contains(keyword))
            .map(|(i, t)| (i + 1, t))
    }

    /// Deadlines with a known date first by date, then the others in list order
    pub fn deadlines_chronological(&self) -> Vec<(usize, &Task)> {
        let mut deadlines: Vec<_> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_deadline())
            .map(|(i, t)| (i + 1, t))
            .collect();
        // None sorts first, so key on absence
        deadlines.sort_by_key(|(_, t)| {
            let due = t.due();
            (due.is_none(), due)
        });
        deadlines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaskList {
        TaskList::from(vec![
            Task::todo("read book"),
            Task::deadline("return book", "Sunday"),
            Task::event("project meeting", "Mon 2pm"),
            Task::deadline("submit report", "2019-12-02"),
            Task::deadline("pay rent", "2019-11-30 1800"),
        ])
    }

    #[test]
    fn test_add() {
        let mut list = TaskList::default();
        assert!(list.is_empty());
        assert_eq!(list.add(Task::todo("read book")), &Task::todo("read book"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_mark_done() {
        let mut list = sample();
        let (task, changed) = list.mark_done(0).unwrap();
        assert!(task.done);
        assert!(changed);
        let (_, changed) = list.mark_done(0).unwrap();
        assert!(!changed);
        assert_eq!(list.mark_done(5), Err(IndexError { number: 6, len: 5 }));
    }

    #[test]
    fn test_delete() {
        let mut list = sample();
        assert_eq!(list.delete(1), Ok(Task::deadline("return book", "Sunday")));
        assert_eq!(list.len(), 4);
        assert_eq!(list.as_slice()[1], Task::event("project meeting", "Mon 2pm"));
        assert_eq!(list.delete(4), Err(IndexError { number: 5, len: 4 }));
    }

    #[test]
    fn test_find() {
        let list = sample();
        let found: Vec<_> = list.find("book").map(|(n, _)| n).collect();
        assert_eq!(found, vec![1, 2]);
        assert_eq!(list.find("Book").count(), 0);
    }

    #[test]
    fn test_deadlines_chronological() {
        let list = sample();
        let numbers: Vec<_> = list
            .deadlines_chronological()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(numbers, vec![5, 4, 2]);
    }
}
