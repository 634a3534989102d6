use crate::{
    config::FeatureFlags,
    todo::{Todo, TodoId, normalize_title},
};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TodoItemProps {
    pub todo: Todo,
    pub features: FeatureFlags,
    pub on_toggle: Callback<TodoId>,
    pub on_rename: Callback<(TodoId, String)>,
    pub on_delete: Callback<TodoId>,
}

#[function_component(TodoItem)]
pub fn todo_item(props: &TodoItemProps) -> Html {
    let editing_state = use_state(|| false);
    let input_ref = use_node_ref();
    let todo = &props.todo;

    let on_toggle = {
        let id = todo.uuid.clone();
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_| on_toggle.emit(id.clone()))
    };

    let on_delete = {
        let id = todo.uuid.clone();
        let on_delete = props.on_delete.clone();
        Callback::from(move |_| on_delete.emit(id.clone()))
    };

    let start_editing = {
        let editing_state = editing_state.clone();
        Callback::from(move |_| editing_state.set(true))
    };

    let cancel_editing = {
        let editing_state = editing_state.clone();
        Callback::from(move |_| editing_state.set(false))
    };

    let on_save = {
        let id = todo.uuid.clone();
        let original = todo.title.clone();
        let editing_state = editing_state.clone();
        let input_ref = input_ref.clone();
        let on_rename = props.on_rename.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(input) = input_ref.cast::<HtmlInputElement>()
                && let Some(title) = normalize_title(&input.value())
                && title != original
            {
                on_rename.emit((id.clone(), title));
            }
            editing_state.set(false);
        })
    };

    if *editing_state && props.features.edit_enabled {
        return html! {
            <li class="todo-item editing">
                <form onsubmit={on_save}>
                    <input ref={input_ref} type="text" value={todo.title.clone()} />
                    <button type="submit">{"Save"}</button>
                    <button type="button" onclick={cancel_editing}>{"Cancel"}</button>
                </form>
            </li>
        };
    }

    html! {
        <li class={classes!("todo-item", todo.completed.then_some("completed"))}>
            <input type="checkbox" checked={todo.completed} onchange={on_toggle} />
            <span class="todo-title">{ &todo.title }</span>
            <span class="todo-created" title={todo.created_at.to_rfc3339()}>
                { todo.created_at.format("%Y-%m-%d %H:%M").to_string() }
            </span>
            if props.features.edit_enabled {
                <button class="todo-edit" onclick={start_editing}>{"Edit"}</button>
            }
            if props.features.delete_enabled {
                <button class="todo-delete" onclick={on_delete}>{"Delete"}</button>
            }
        </li>
    }
}
