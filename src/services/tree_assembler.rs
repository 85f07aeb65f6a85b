use std::collections::VecDeque;
use std::time::Instant;

use crate::database::repositories::comments::CommentsRepository;
use crate::entities::comment::Comment;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::utils::db_utils::Pagination;
use crate::models::view::comment::{CommentNode, CommentView, ReplyCursor};

/// Breadth-first thread loader. Expands a page of seed comments level by
/// level, loading at most `child_fetch_limit` children per parent and never
/// materializing more than `budget` nodes in total. Deleted comments are
/// loaded too so their replies stay reachable.
///
/// Branches that could not be fully expanded come back with `has_more` set
/// and a cursor pointing at the first child row that was left behind. When
/// the deadline passes mid-walk the partial tree built so far is returned,
/// every unexpanded node marked `has_more` so clients can resume.
pub struct TreeAssembler<'a> {
    comments: &'a CommentsRepository,
    child_fetch_limit: u8,
    deadline: Instant,
}

struct Slot {
    view: CommentView,
    children: Vec<usize>,
    replies_total: u64,
    has_more: bool,
    next_start: Option<u32>,
}

impl Slot {
    fn new(comment: &Comment) -> Self {
        Self {
            view: CommentView::from(comment),
            children: Vec::new(),
            replies_total: 0,
            has_more: false,
            next_start: None,
        }
    }

    fn mark_unexpanded(&mut self) {
        self.has_more = true;
        self.next_start = Some(0);
    }
}

impl<'a> TreeAssembler<'a> {
    pub fn new(comments: &'a CommentsRepository, child_fetch_limit: u8, deadline: Instant) -> Self {
        Self {
            comments,
            child_fetch_limit,
            deadline,
        }
    }

    pub async fn assemble(&self, seeds: &[Comment], budget: u32) -> AppResult<Vec<CommentNode>> {
        let mut arena: Vec<Slot> = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();

        let seed_take = seeds.len().min(budget as usize);
        for comment in &seeds[..seed_take] {
            arena.push(Slot::new(comment));
            queue.push_back(arena.len() - 1);
        }
        let roots: Vec<usize> = (0..seed_take).collect();
        let mut budget = budget.saturating_sub(seed_take as u32);

        while let Some(idx) = queue.pop_front() {
            if Instant::now() >= self.deadline {
                arena[idx].mark_unexpanded();
                for rest in queue {
                    arena[rest].mark_unexpanded();
                }
                return fold(arena, &roots);
            }

            let parent_id = arena[idx].view.id.clone();

            if budget == 0 {
                // Out of room for child nodes, but still report how many
                // replies the branch holds so clients know to follow up.
                match self.comments.count_children(&parent_id, true).await {
                    Ok(total) => {
                        arena[idx].replies_total = total;
                        if total > 0 {
                            arena[idx].has_more = true;
                            arena[idx].next_start = Some(0);
                        }
                    }
                    Err(AppError::QueryTimeout) => {
                        arena[idx].mark_unexpanded();
                        for rest in queue {
                            arena[rest].mark_unexpanded();
                        }
                        return fold(arena, &roots);
                    }
                    Err(err) => return Err(err),
                }
                continue;
            }

            let page = Pagination {
                start: 0,
                count: self.child_fetch_limit,
            };
            let (children, total) = match self.comments.get_child_page(&parent_id, page, true).await
            {
                Ok(result) => result,
                Err(AppError::QueryTimeout) => {
                    arena[idx].mark_unexpanded();
                    for rest in queue {
                        arena[rest].mark_unexpanded();
                    }
                    return fold(arena, &roots);
                }
                Err(err) => return Err(err),
            };

            arena[idx].replies_total = total;
            let take = children.len().min(budget as usize);
            for child in &children[..take] {
                arena.push(Slot::new(child));
                let child_idx = arena.len() - 1;
                arena[idx].children.push(child_idx);
                queue.push_back(child_idx);
            }
            budget -= take as u32;
            if total > take as u64 {
                arena[idx].has_more = true;
                arena[idx].next_start = Some(take as u32);
            }
        }

        fold(arena, &roots)
    }
}

/// Children always sit at higher arena indices than their parent, so a
/// single reverse pass can assemble every subtree before its parent asks
/// for it.
fn fold(arena: Vec<Slot>, roots: &[usize]) -> AppResult<Vec<CommentNode>> {
    let mut built: Vec<Option<CommentNode>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);

    for idx in (0..arena.len()).rev() {
        let slot = &arena[idx];
        let mut replies = Vec::with_capacity(slot.children.len());
        for &child_idx in &slot.children {
            if let Some(node) = built[child_idx].take() {
                replies.push(node);
            }
        }
        let next_cursor = match slot.next_start {
            Some(start) => Some(
                ReplyCursor {
                    parent: slot.view.id.to_string(),
                    start,
                }
                .encode()?,
            ),
            None => None,
        };
        built[idx] = Some(CommentNode {
            comment: slot.view.clone(),
            replies,
            replies_total: slot.replies_total,
            has_more: slot.has_more,
            next_cursor,
        });
    }

    Ok(roots.iter().filter_map(|&idx| built[idx].take()).collect())
}
