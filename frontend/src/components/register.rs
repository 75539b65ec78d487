use accountdesk::{AppRoute, Role};
use accountdesk::validate::Field;
use accountdesk::views::RegisterForm;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{use_auth, use_cancel_token};
use crate::components::banner::{BannerView, FieldHint};
use crate::components::login::RoleSelect;
use crate::web::router::Link;

/// 单行文本输入，绑定到注册草稿的某个字段
#[component]
fn DraftInput(
    form: RwSignal<RegisterForm>,
    field: Field,
    label: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    let value = move || {
        form.with(|f| match field {
            Field::Name => f.draft.name.clone(),
            Field::Phone => f.draft.phone.clone(),
            Field::Email => f.draft.email.clone(),
            Field::Password => f.draft.password.clone(),
            Field::Dob => f.draft.dob.clone(),
            Field::ProfilePic => f.draft.profile_pic.clone(),
            Field::Identifier | Field::File => String::new(),
        })
    };
    let hint = Signal::derive(move || form.with(|f| f.field_errors.for_field(field).map(str::to_string)));

    view! {
        <div class="form-control">
            <label class="label" for=field.as_str()>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=field.as_str()
                name=field.as_str()
                type=input_type
                placeholder=placeholder
                on:input=move |ev| form.update(|f| f.draft.set(field, event_target_value(&ev)))
                prop:value=value
                class="input input-bordered"
            />
            <FieldHint message=hint />
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let cancel = use_cancel_token();
    let form = RwSignal::new(RegisterForm::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(req) = form.try_update(|f| f.begin_submit()).flatten() else {
            return;
        };

        let api = auth.api();
        let cancel = cancel.clone();
        spawn_local(async move {
            let result = api.register(&req, &cancel).await;
            form.try_update(|f| f.finish_submit(result));
        });
    };

    let loading = move || form.with(|f| f.loading);

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Register"</h1>
                    <p class="text-base-content/70">"Create a new account"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        <BannerView
                            banner=Signal::derive(move || form.with(|f| f.banner.clone()))
                            on_dismiss=move |_| form.update(|f| f.banner = None)
                        />
                        {move || form.with(|f| f.status_note.clone()).map(|note| view! {
                            <p class="text-sm text-success">{note}</p>
                        })}

                        <DraftInput form field=Field::Name label="Full Name" placeholder="Ada Lovelace" />
                        <DraftInput form field=Field::Phone label="Phone" input_type="tel" placeholder="+1234567890" />
                        <DraftInput form field=Field::Email label="Email" input_type="email" placeholder="you@example.com" />
                        <DraftInput form field=Field::Password label="Password" input_type="password" placeholder="At least 8 characters" />
                        <DraftInput form field=Field::Dob label="Date of Birth" input_type="date" />
                        <DraftInput form field=Field::ProfilePic label="Profile Picture URL" placeholder="https://example.com/me.png" />

                        <RoleSelect
                            role=Signal::derive(move || form.with(|f| f.draft.role))
                            on_change=move |role: Role| form.update(|f| f.draft.role = role)
                        />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=loading>
                                {move || if loading() {
                                    view! { <span class="loading loading-spinner"></span> "Registering..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>

                        <p class="text-center text-sm">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary">"Login"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
