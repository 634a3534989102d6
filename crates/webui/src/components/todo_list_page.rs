use crate::{
    app::Route,
    client::{ClientError, TodoClient},
    components::{notice::NoticeContext, todo_item::TodoItem},
    config::AppConfig,
    todo::{Filter, Todo, TodoId, any_completed, count_remaining, normalize_title},
};
use log::{debug, error};
use std::{future::Future, rc::Rc};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TodoListPageProps {
    pub filter: Filter,
}

/// Runs a mutation against the backend, then bumps the refresh counter so
/// the list is fetched again. Failures go to the notice area.
fn run_then_refresh<F>(
    what: &'static str,
    fut: F,
    refresh_counter_state: UseStateHandle<u32>,
    notices: NoticeContext,
) where
    F: Future<Output = Result<(), ClientError>> + 'static,
{
    spawn_local(async move {
        if let Err(err) = fut.await {
            error!("Failed to {what}: {err:?}");
            notices.error(format!("Failed to {what}: {err}"));
        }
        refresh_counter_state.set(refresh_counter_state.wrapping_add(1));
    });
}

#[function_component(TodoListPage)]
pub fn todo_list_page(TodoListPageProps { filter }: &TodoListPageProps) -> Html {
    let config =
        use_context::<Rc<AppConfig>>().expect("AppConfig context is set when starting the App");
    let notices =
        use_context::<NoticeContext>().expect("NoticeContext is provided by NoticeProvider");
    let client = use_memo(config.base_url.clone(), |base_url| {
        TodoClient::new(base_url.clone())
    });
    let features = config.features;

    let todos_state = use_state(|| None::<Vec<Todo>>);
    let refresh_counter_state = use_state(|| 0u32); // Force calling use_effect
    let input_ref = use_node_ref();

    {
        let client = client.clone();
        let todos_state = todos_state.clone();
        let notices = notices.clone();
        use_effect_with(*refresh_counter_state, move |_| {
            spawn_local(async move {
                match client.list().await {
                    Ok(todos) => {
                        debug!("Got {} todos", todos.len());
                        todos_state.set(Some(todos));
                    }
                    Err(err) => {
                        error!("Failed to list todos: {err:?}");
                        notices.error(format!("Failed to load todos: {err}"));
                    }
                }
            });
        });
    }

    let on_create = {
        let client = client.clone();
        let input_ref = input_ref.clone();
        let refresh_counter_state = refresh_counter_state.clone();
        let notices = notices.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(input) = input_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let Some(title) = normalize_title(&input.value()) else {
                return;
            };
            input.set_value("");
            let client = client.clone();
            run_then_refresh(
                "create todo",
                async move { client.create(&title).await.map(drop) },
                refresh_counter_state.clone(),
                notices.clone(),
            );
        })
    };

    let on_toggle = {
        let client = client.clone();
        let refresh_counter_state = refresh_counter_state.clone();
        let notices = notices.clone();
        Callback::from(move |id: TodoId| {
            let client = client.clone();
            run_then_refresh(
                "update todo",
                async move { client.toggle_complete(&id).await },
                refresh_counter_state.clone(),
                notices.clone(),
            );
        })
    };

    let on_rename = {
        let client = client.clone();
        let refresh_counter_state = refresh_counter_state.clone();
        let notices = notices.clone();
        Callback::from(move |(id, title): (TodoId, String)| {
            let client = client.clone();
            run_then_refresh(
                "rename todo",
                async move { client.update(&id, &title).await },
                refresh_counter_state.clone(),
                notices.clone(),
            );
        })
    };

    let on_delete = {
        let client = client.clone();
        let refresh_counter_state = refresh_counter_state.clone();
        let notices = notices.clone();
        Callback::from(move |id: TodoId| {
            let client = client.clone();
            run_then_refresh(
                "delete todo",
                async move { client.delete(&id).await },
                refresh_counter_state.clone(),
                notices.clone(),
            );
        })
    };

    let on_clear_completed = {
        let client = client.clone();
        let refresh_counter_state = refresh_counter_state.clone();
        let notices = notices.clone();
        Callback::from(move |_| {
            let client = client.clone();
            run_then_refresh(
                "clear completed todos",
                async move { client.clear_completed().await },
                refresh_counter_state.clone(),
                notices.clone(),
            );
        })
    };

    let Some(todos) = (*todos_state).as_ref() else {
        return html! { <p class="loading">{"Loading todos..."}</p> };
    };
    let remaining = count_remaining(todos);

    html! {
        <section class="todo-list">
            <form class="todo-new" onsubmit={on_create}>
                <input ref={input_ref} type="text" placeholder="What needs to be done?" />
                <button type="submit">{"Add"}</button>
            </form>
            <ul>
                { for todos.iter().filter(|todo| filter.matches(todo)).map(|todo| html! {
                    <TodoItem
                        key={todo.uuid.to_string()}
                        todo={todo.clone()}
                        {features}
                        on_toggle={on_toggle.clone()}
                        on_rename={on_rename.clone()}
                        on_delete={on_delete.clone()}
                    />
                })}
            </ul>
            <footer class="todo-footer">
                <span class="todo-count">
                    { format!("{remaining} item{} left", if remaining == 1 { "" } else { "s" }) }
                </span>
                <nav class="todo-filters">
                    { for [(Filter::All, Route::Home), (Filter::Active, Route::Active), (Filter::Completed, Route::Completed)]
                        .into_iter()
                        .map(|(link_filter, route)| html! {
                            <Link<Route> to={route} classes={classes!((link_filter == *filter).then_some("selected"))}>
                                { link_filter.label() }
                            </Link<Route>>
                        })
                    }
                </nav>
                if features.delete_enabled && any_completed(todos) {
                    <button class="todo-clear" onclick={on_clear_completed}>{"Clear completed"}</button>
                }
            </footer>
        </section>
    }
}
