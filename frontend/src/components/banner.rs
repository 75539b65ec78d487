use accountdesk::views::{Banner, BannerKind};
use leptos::prelude::*;

/// 可关闭的提示横幅
///
/// 横幅带 `auto_dismiss` 时到期自动关闭；期间换成别的横幅则不再关闭。
#[component]
pub fn BannerView(
    #[prop(into)] banner: Signal<Option<Banner>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    Effect::new(move |_| {
        let Some(shown) = banner.get() else { return };
        let Some(delay) = shown.auto_dismiss else { return };
        set_timeout(
            move || {
                if banner.get_untracked().as_ref() == Some(&shown) {
                    on_dismiss.run(());
                }
            },
            delay,
        );
    });

    move || {
        banner.get().map(|b| {
            let class = match b.kind {
                BannerKind::Success => "alert alert-success text-sm py-2",
                BannerKind::Error => "alert alert-error text-sm py-2",
            };
            view! {
                <div role="alert" class=class>
                    <span class="flex-1">{b.message}</span>
                    <button
                        type="button"
                        class="btn btn-ghost btn-xs"
                        aria-label="Dismiss"
                        on:click=move |_| on_dismiss.run(())
                    >
                        "✕"
                    </button>
                </div>
            }
        })
    }
}

/// 字段下方的校验提示
#[component]
pub fn FieldHint(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message
            .get()
            .map(|m| view! { <span class="label-text-alt text-error">{m}</span> })
    }
}
