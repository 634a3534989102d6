//! Transient messages shown above the todo list.
//!
//! ```rust,ignore
//! let notices = use_context::<NoticeContext>().expect("NoticeProvider is mounted");
//! notices.error(format!("Cannot load todos: {err}"));
//! ```

use gloo::timers::callback::Timeout;
use std::{cell::RefCell, rc::Rc};
use yew::prelude::*;

/// Time in milliseconds before a notice disappears on its own.
const AUTO_DISMISS_MS: u32 = 5000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

impl NoticeLevel {
    fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice-info",
            NoticeLevel::Error => "notice-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct NoticeBoard {
    pub notices: Vec<Notice>,
}

pub enum NoticeAction {
    Push {
        id: u32,
        level: NoticeLevel,
        message: String,
    },
    Dismiss(u32),
}

impl Reducible for NoticeBoard {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut board = (*self).clone();
        match action {
            NoticeAction::Push { id, level, message } => {
                board.notices.push(Notice { id, level, message });
            }
            NoticeAction::Dismiss(id) => board.notices.retain(|notice| notice.id != id),
        }
        Rc::new(board)
    }
}

fn next_notice_id(counter: &RefCell<u32>) -> u32 {
    let mut next = counter.borrow_mut();
    let id = *next;
    *next = next.wrapping_add(1);
    id
}

#[derive(Clone)]
pub struct NoticeContext {
    board: UseReducerHandle<NoticeBoard>,
    next_id: Rc<RefCell<u32>>,
}

impl PartialEq for NoticeContext {
    fn eq(&self, other: &Self) -> bool {
        *self.board == *other.board
    }
}

impl NoticeContext {
    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    pub fn dismiss(&self, id: u32) {
        self.board.dispatch(NoticeAction::Dismiss(id));
    }

    /// Shows the notice and starts its own dismissal timer.
    fn push(&self, level: NoticeLevel, message: String) {
        let id = next_notice_id(&self.next_id);
        self.board.dispatch(NoticeAction::Push { id, level, message });
        let board = self.board.clone();
        Timeout::new(AUTO_DISMISS_MS, move || {
            board.dispatch(NoticeAction::Dismiss(id));
        })
        .forget();
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeProviderProps {
    pub children: Children,
}

#[function_component(NoticeProvider)]
pub fn notice_provider(props: &NoticeProviderProps) -> Html {
    let board = use_reducer(NoticeBoard::default);
    let next_id = use_mut_ref(|| 0_u32);
    let context = NoticeContext {
        board: board.clone(),
        next_id,
    };

    html! {
        <ContextProvider<NoticeContext> context={context.clone()}>
            if !board.notices.is_empty() {
                <div class="notice-container">
                    { for board.notices.iter().map(|notice| {
                        let id = notice.id;
                        let context = context.clone();
                        let onclick = Callback::from(move |_| context.dismiss(id));
                        html! {
                            <div class={classes!("notice", notice.level.css_class())} key={id}>
                                <span class="notice-message">{ &notice.message }</span>
                                <button class="notice-dismiss" {onclick} aria-label="Dismiss">
                                    {"×"}
                                </button>
                            </div>
                        }
                    })}
                </div>
            }
            { props.children.clone() }
        </ContextProvider<NoticeContext>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(
        board: Rc<NoticeBoard>,
        id: u32,
        level: NoticeLevel,
        message: &str,
    ) -> Rc<NoticeBoard> {
        board.reduce(NoticeAction::Push {
            id,
            level,
            message: message.to_string(),
        })
    }

    fn ids(board: &NoticeBoard) -> Vec<u32> {
        board.notices.iter().map(|n| n.id).collect()
    }

    #[test]
    fn ids_are_allocated_per_push() {
        let counter = RefCell::new(0);
        assert_eq!(0, next_notice_id(&counter));
        assert_eq!(1, next_notice_id(&counter));
        assert_eq!(2, *counter.borrow());
    }

    #[test]
    fn id_counter_wraps() {
        let counter = RefCell::new(u32::MAX);
        assert_eq!(u32::MAX, next_notice_id(&counter));
        assert_eq!(0, next_notice_id(&counter));
    }

    #[test]
    fn dismiss_removes_only_the_given_notice() {
        let board = Rc::new(NoticeBoard::default());
        let board = push(board, 0, NoticeLevel::Info, "one");
        let board = push(board, 1, NoticeLevel::Error, "two");
        assert_eq!(vec![0, 1], ids(&board));

        let board = board.reduce(NoticeAction::Dismiss(0));
        assert_eq!(1, board.notices.len());
        assert_eq!("two", board.notices[0].message);
        assert_eq!(NoticeLevel::Error, board.notices[0].level);
    }

    // Two notices pushed back to back each get a timer; both timers fire.
    #[test]
    fn back_to_back_notices_are_both_dismissed() {
        let board = Rc::new(NoticeBoard::default());
        let board = push(board, 0, NoticeLevel::Error, "first");
        let board = push(board, 1, NoticeLevel::Error, "second");

        let board = board.reduce(NoticeAction::Dismiss(0));
        let board = board.reduce(NoticeAction::Dismiss(1));
        assert!(board.notices.is_empty());
    }

    // A manual dismiss followed by the expiring timer of the same notice.
    #[test]
    fn dismissing_twice_is_a_noop() {
        let board = push(Rc::new(NoticeBoard::default()), 0, NoticeLevel::Info, "gone");
        let board = push(board, 1, NoticeLevel::Info, "kept");
        let board = board.reduce(NoticeAction::Dismiss(0));
        let board = board.reduce(NoticeAction::Dismiss(0));
        assert_eq!(vec![1], ids(&board));
    }

    #[test]
    fn dismissing_unknown_id_is_a_noop() {
        let board = push(Rc::new(NoticeBoard::default()), 0, NoticeLevel::Info, "kept");
        let board = board.reduce(NoticeAction::Dismiss(42));
        assert_eq!(1, board.notices.len());
    }
}
