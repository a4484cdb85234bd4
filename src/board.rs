use crate::models::{Status, Todo};

/// What a grabbed card is currently hovering over: a lane container
/// itself, or another card (whose lane is then adopted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Lane(Status),
    Card(i64),
}

/// One grab-and-move interaction. Lives from grab until drop/cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub todo_id: i64,
    pub origin: Status,
    pub over: Option<DropTarget>,
}

impl DragSession {
    pub fn start(todo_id: i64, origin: Status) -> Self {
        Self {
            todo_id,
            origin,
            over: None,
        }
    }
}

/// Borrow the cards of one lane, preserving list order (newest first)
pub fn lane_todos(todos: &[Todo], lane: Status) -> Vec<&Todo> {
    todos.iter().filter(|t| t.status == lane).collect()
}

/// Card counts per lane, in `Status::ALL` order
pub fn lane_counts(todos: &[Todo]) -> [usize; 3] {
    let mut counts = [0; 3];
    for todo in todos {
        match todo.status {
            Status::Todo => counts[0] += 1,
            Status::InProgress => counts[1] += 1,
            Status::Done => counts[2] += 1,
        }
    }
    counts
}

/// Resolve the lane a drop target denotes: a lane container names its
/// lane directly; a card target means that card's current lane.
pub fn target_lane(todos: &[Todo], target: DropTarget) -> Option<Status> {
    match target {
        DropTarget::Lane(lane) => Some(lane),
        DropTarget::Card(id) => todos.iter().find(|t| t.id == Some(id)).map(|t| t.status),
    }
}

/// The "over" phase: while the grab is held, preview the move by
/// reassigning the dragged card's lane in the in-memory list only.
/// Hovering a card in the dragged card's own lane is a no-op, as is
/// hovering the lane it is already in. Returns true if the list changed.
pub fn drag_over(todos: &mut [Todo], active_id: i64, target: DropTarget) -> bool {
    let Some(lane) = target_lane(todos, target) else {
        return false;
    };

    let Some(active) = todos.iter_mut().find(|t| t.id == Some(active_id)) else {
        return false;
    };

    if active.status == lane {
        return false;
    }

    active.status = lane;
    true
}

/// The "end" phase: the lane to persist, resolved with the same rule as
/// the over phase. `None` when the drop had no valid target, in which
/// case nothing is written.
pub fn resolve_drop(todos: &[Todo], over: Option<DropTarget>) -> Option<Status> {
    over.and_then(|target| target_lane(todos, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, title: &str, status: Status) -> Todo {
        let mut t = Todo::new(title.to_string());
        t.id = Some(id);
        t.status = status;
        t
    }

    fn board() -> Vec<Todo> {
        vec![
            todo(1, "write report", Status::Todo),
            todo(2, "review patch", Status::InProgress),
            todo(3, "ship release", Status::Done),
            todo(4, "file expenses", Status::Todo),
        ]
    }

    #[test]
    fn empty_board_has_empty_lanes() {
        let todos: Vec<Todo> = Vec::new();
        assert_eq!(lane_counts(&todos), [0, 0, 0]);
        for lane in Status::ALL {
            assert!(lane_todos(&todos, lane).is_empty());
        }
    }

    #[test]
    fn partition_preserves_list_order_within_lanes() {
        let todos = board();
        let lane = lane_todos(&todos, Status::Todo);
        assert_eq!(lane.len(), 2);
        assert_eq!(lane[0].id, Some(1));
        assert_eq!(lane[1].id, Some(4));
        assert_eq!(lane_counts(&todos), [2, 1, 1]);
    }

    #[test]
    fn hovering_a_lane_container_previews_the_move() {
        let mut todos = board();
        let changed = drag_over(&mut todos, 1, DropTarget::Lane(Status::Done));
        assert!(changed);
        assert_eq!(todos[0].status, Status::Done);
        assert_eq!(lane_counts(&todos), [1, 1, 2]);
    }

    #[test]
    fn hovering_the_current_lane_is_a_no_op() {
        let mut todos = board();
        assert!(!drag_over(&mut todos, 1, DropTarget::Lane(Status::Todo)));
        assert_eq!(lane_counts(&todos), [2, 1, 1]);
    }

    #[test]
    fn hovering_a_card_adopts_its_lane() {
        let mut todos = board();
        let changed = drag_over(&mut todos, 1, DropTarget::Card(2));
        assert!(changed);
        assert_eq!(todos[0].status, Status::InProgress);
    }

    #[test]
    fn hovering_a_same_lane_card_is_a_no_op() {
        let mut todos = board();
        assert!(!drag_over(&mut todos, 1, DropTarget::Card(4)));
        assert_eq!(todos[0].status, Status::Todo);
    }

    #[test]
    fn hovering_a_missing_card_changes_nothing() {
        let mut todos = board();
        assert!(!drag_over(&mut todos, 1, DropTarget::Card(99)));
        assert_eq!(lane_counts(&todos), [2, 1, 1]);
    }

    #[test]
    fn repeated_over_events_settle_on_the_last_target() {
        // "over" can fire many times during one drag
        let mut todos = board();
        drag_over(&mut todos, 1, DropTarget::Lane(Status::InProgress));
        drag_over(&mut todos, 1, DropTarget::Lane(Status::Done));
        drag_over(&mut todos, 1, DropTarget::Lane(Status::Done));
        assert_eq!(todos[0].status, Status::Done);
    }

    #[test]
    fn drop_resolution_matches_over_rule() {
        let todos = board();
        assert_eq!(
            resolve_drop(&todos, Some(DropTarget::Lane(Status::Done))),
            Some(Status::Done)
        );
        assert_eq!(
            resolve_drop(&todos, Some(DropTarget::Card(2))),
            Some(Status::InProgress)
        );
        assert_eq!(resolve_drop(&todos, None), None);
        assert_eq!(resolve_drop(&todos, Some(DropTarget::Card(99))), None);
    }

    #[test]
    fn board_scenario_counts() {
        // empty -> add "Buy milk" -> move it to done
        let mut todos: Vec<Todo> = Vec::new();
        assert_eq!(lane_counts(&todos), [0, 0, 0]);

        todos.push(todo(1, "Buy milk", Status::Todo));
        assert_eq!(lane_counts(&todos), [1, 0, 0]);

        drag_over(&mut todos, 1, DropTarget::Lane(Status::Done));
        let final_lane = resolve_drop(&todos, Some(DropTarget::Lane(Status::Done)));
        assert_eq!(final_lane, Some(Status::Done));
        assert_eq!(lane_counts(&todos), [0, 0, 1]);
    }
}
