use std::rc::Rc;

use fetch_client::{
    ActivityToken, FetchAction, FetchState, Transport, run_cycle,
};
use serde::de::DeserializeOwned;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::get_transport;

/// Url fetch hook return type
#[derive(Clone, Debug, PartialEq)]
pub struct FetchHookReturn<V> {
    pub data: V,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl<V> From<FetchState<V>> for FetchHookReturn<V> {
    fn from(state: FetchState<V>) -> Self {
        Self {
            data: state.data,
            error: state.error,
            is_loading: state.is_loading,
        }
    }
}

impl<V> FetchHookReturn<V> {
    /// Render the fetched data, or a loading/error message labelled with
    /// `context` (e.g. "posts").
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&V) -> Html,
    {
        if let Some(error) = &self.error {
            return html! {
                <div class="p-4 rounded-md bg-red-50 border border-red-200">
                    <p class="text-sm text-red-700">
                        {format!("Error loading {}: {}", context, error)}
                    </p>
                </div>
            };
        }
        if self.is_loading {
            return html! {
                <div class="text-center py-12">
                    <p class="text-neutral-600">
                        {format!("Loading {}...", context)}
                    </p>
                </div>
            };
        }
        render_fn(&self.data)
    }
}

#[derive(Default)]
struct FetchStore<V>(FetchState<V>);

impl<V: Clone + Default> Reducible for FetchStore<V> {
    type Action = FetchAction<V>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut state = self.0.clone();
        state.apply(action);
        Rc::new(Self(state))
    }
}

/// Fetch `url` with the default transport, refetching whenever `url`
/// changes.
///
/// # Example
///
/// ```rust,ignore
/// #[function_component]
/// fn PostList() -> Html {
///     let posts = use_url_fetch::<Vec<Post>>("/api/posts".to_string());
///     posts.render("posts", |posts| html! {
///         <ul>{for posts.iter().map(|p| html! { <li>{&p.title}</li> })}</ul>
///     })
/// }
/// ```
#[hook]
pub fn use_url_fetch<V>(url: String) -> FetchHookReturn<V>
where
    V: DeserializeOwned + Clone + Default + 'static,
{
    let transport = use_memo((), |_| get_transport());
    use_url_fetch_with(transport, url)
}

/// Fetch `url` through `transport`.
///
/// Each url gets its own [`ActivityToken`]. The effect clean-up, which
/// runs on unmount and before the effect re-fires for a new url,
/// deactivates it: the in-flight request is cancelled and its result is
/// never dispatched.
#[hook]
pub fn use_url_fetch_with<V, T>(
    transport: Rc<T>,
    url: String,
) -> FetchHookReturn<V>
where
    V: DeserializeOwned + Clone + Default + 'static,
    T: Transport + 'static,
{
    let store = use_reducer(FetchStore::<V>::default);

    {
        let dispatcher = store.dispatcher();

        use_effect_with(url, move |url| {
            let token = ActivityToken::new();
            dispatcher.dispatch(FetchAction::Started);

            {
                let token = token.clone();
                let url = url.clone();
                let sink =
                    move |action: FetchAction<V>| dispatcher.dispatch(action);
                spawn_local(async move {
                    run_cycle(transport.as_ref(), &url, token, sink).await;
                });
            }

            move || {
                if token.deactivate() {
                    tracing::debug!("cleaned up url fetch");
                }
            }
        });
    }

    store.0.clone().into()
}
