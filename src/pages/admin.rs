//! Administration page: full lesson catalog with removal. Reached only
//! through the privileged guard.

use leptos::prelude::*;

use crate::net::gateway::Gateway;

#[component]
pub fn AdminPage() -> impl IntoView {
    let gateway = expect_context::<Gateway>();
    let error = RwSignal::new(None::<String>);

    let lessons = LocalResource::new(move || crate::net::api::fetch_lessons(gateway));

    view! {
        <div class="admin-page">
            <header class="admin-page__header">
                <h1>"Manage lessons"</h1>
            </header>

            {move || error.get().map(|message| view! { <p class="admin-page__error">{message}</p> })}

            <Suspense fallback=move || view! { <p>"Loading catalog..."</p> }>
                {move || {
                    lessons
                        .get()
                        .map(|fetched| match fetched {
                            Some(list) if !list.is_empty() => {
                                view! {
                                    <ul class="admin-page__list">
                                        {list
                                            .into_iter()
                                            .map(|lesson| {
                                                let id = lesson.id.clone();
                                                let author =
                                                    lesson.author_email.clone().unwrap_or_default();
                                                let on_delete = move |_| {
                                                    let id = id.clone();
                                                    #[cfg(feature = "csr")]
                                                    {
                                                        let lessons = lessons.clone();
                                                        leptos::task::spawn_local(async move {
                                                            match crate::net::api::delete_lesson(
                                                                gateway, id,
                                                            )
                                                            .await
                                                            {
                                                                Ok(()) => lessons.refetch(),
                                                                Err(err) => error
                                                                    .set(Some(err.to_string())),
                                                            }
                                                        });
                                                    }
                                                    #[cfg(not(feature = "csr"))]
                                                    {
                                                        let _ = id;
                                                    }
                                                };
                                                view! {
                                                    <li class="admin-page__row">
                                                        <span class="admin-page__title">
                                                            {lesson.title.clone()}
                                                        </span>
                                                        <span class="admin-page__author">{author}</span>
                                                        <button class="btn btn--danger" on:click=on_delete>
                                                            "Delete"
                                                        </button>
                                                    </li>
                                                }
                                            })
                                            .collect::<Vec<_>>()}
                                    </ul>
                                }
                                    .into_any()
                            }
                            Some(_) => {
                                view! { <p class="admin-page__empty">"The catalog is empty."</p> }
                                    .into_any()
                            }
                            None => {
                                view! { <p class="admin-page__error">"Couldn't load the catalog."</p> }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}
