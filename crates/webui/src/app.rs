use crate::{
    components::{not_found::NotFound, notice::NoticeProvider, todo_list_page::TodoListPage},
    config::AppConfig,
    todo::Filter,
};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/active")]
    Active,
    #[at("/completed")]
    Completed,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    pub fn filter(&self) -> Option<Filter> {
        match self {
            Route::Home => Some(Filter::All),
            Route::Active => Some(Filter::Active),
            Route::Completed => Some(Filter::Completed),
            Route::NotFound => None,
        }
    }

    pub fn render(route: Route) -> Html {
        match route.filter() {
            Some(filter) => html! { <TodoListPage {filter} /> },
            None => html! { <NotFound /> },
        }
    }
}

#[derive(PartialEq, Properties)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

#[function_component(App)]
pub fn app(AppProps { config }: &AppProps) -> Html {
    html! {
        <ContextProvider<Rc<AppConfig>> context={config.clone()}>
            <NoticeProvider>
                <div class="container">
                    <BrowserRouter>
                        <h1>{"Todos"}</h1>
                        <Switch<Route> render={Route::render} />
                    </BrowserRouter>
                </div>
            </NoticeProvider>
        </ContextProvider<Rc<AppConfig>>>
    }
}
