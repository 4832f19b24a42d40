//! Public lesson catalog.

use leptos::prelude::*;

use crate::components::lesson_card::LessonCard;
use crate::net::gateway::Gateway;

/// Landing page: browsable lesson catalog, no sign-in required.
#[component]
pub fn HomePage() -> impl IntoView {
    let gateway = expect_context::<Gateway>();

    let lessons = LocalResource::new(move || crate::net::api::fetch_lessons(gateway));

    view! {
        <div class="home-page">
            <header class="home-page__header">
                <h1>"Browse lessons"</h1>
            </header>

            <Suspense fallback=move || view! { <p>"Loading lessons..."</p> }>
                {move || {
                    lessons
                        .get()
                        .map(|fetched| match fetched {
                            Some(list) if !list.is_empty() => {
                                view! {
                                    <div class="home-page__grid">
                                        {list
                                            .into_iter()
                                            .map(|lesson| view! { <LessonCard lesson=lesson/> })
                                            .collect::<Vec<_>>()}
                                    </div>
                                }
                                    .into_any()
                            }
                            Some(_) => {
                                view! { <p class="home-page__empty">"No lessons published yet."</p> }
                                    .into_any()
                            }
                            None => {
                                view! {
                                    <p class="home-page__error">
                                        "Couldn't load lessons. Try again in a moment."
                                    </p>
                                }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}
