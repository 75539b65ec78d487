use accountdesk::validate::Field;
use accountdesk::views::LoginForm;
use accountdesk::{AppRoute, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{use_auth, use_cancel_token};
use crate::components::banner::{BannerView, FieldHint};
use crate::web::router::Link;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let cancel = use_cancel_token();
    let form = RwSignal::new(LoginForm::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(req) = form.try_update(|f| f.begin_submit()).flatten() else {
            return;
        };

        let api = auth.api();
        let cancel = cancel.clone();
        spawn_local(async move {
            let result = api.login(&req, &cancel).await;
            let mut guard = auth.guard.get_untracked();
            let authed = form
                .try_update(|f| f.finish_submit(result, &mut guard))
                .unwrap_or(false);
            // 守卫翻转后路由服务会把登录页重定向到资料页
            if authed {
                auth.set_guard(guard);
            }
        });
    };

    let hint = move |field: Field| {
        Signal::derive(move || form.with(|f| f.field_errors.for_field(field).map(str::to_string)))
    };
    let loading = move || form.with(|f| f.loading);

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Login"</h1>
                    <p class="text-base-content/70">"Sign in with your email or phone number"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        <BannerView
                            banner=Signal::derive(move || form.with(|f| f.banner.clone()))
                            on_dismiss=move |_| form.update(|f| f.banner = None)
                        />

                        <div class="form-control">
                            <label class="label" for="identifier">
                                <span class="label-text">"Email or Phone"</span>
                            </label>
                            <input
                                id="identifier"
                                name=Field::Identifier.as_str()
                                type="text"
                                placeholder="you@example.com or +1234567890"
                                on:input=move |ev| {
                                    form.update(|f| f.draft.identifier = event_target_value(&ev))
                                }
                                prop:value=move || form.with(|f| f.draft.identifier.clone())
                                class="input input-bordered"
                            />
                            <FieldHint message=hint(Field::Identifier) />
                        </div>

                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                name=Field::Password.as_str()
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| {
                                    form.update(|f| f.draft.password = event_target_value(&ev))
                                }
                                prop:value=move || form.with(|f| f.draft.password.clone())
                                class="input input-bordered"
                            />
                            <FieldHint message=hint(Field::Password) />
                        </div>

                        <RoleSelect
                            role=Signal::derive(move || form.with(|f| f.draft.role))
                            on_change=move |role: Role| form.update(|f| f.draft.role = role)
                        />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=loading>
                                {move || if loading() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Login".into_any()
                                }}
                            </button>
                        </div>

                        <p class="text-center text-sm">
                            "Don't have an account? "
                            <Link to=AppRoute::Register class="link link-primary">"Register"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

/// 角色下拉框，注册和登录共用
#[component]
pub fn RoleSelect(
    #[prop(into)] role: Signal<Role>,
    #[prop(into)] on_change: Callback<Role>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for="role">
                <span class="label-text">"Role"</span>
            </label>
            <select
                id="role"
                name="role"
                class="select select-bordered"
                on:change=move |ev| {
                    if let Ok(role) = event_target_value(&ev).parse::<Role>() {
                        on_change.run(role);
                    }
                }
                prop:value=move || role.get().as_str()
            >
                <option value=Role::User.as_str()>"User"</option>
                <option value=Role::Admin.as_str()>"Admin"</option>
            </select>
        </div>
    }
}
