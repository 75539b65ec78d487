use accountdesk::validate::Field;
use accountdesk::views::profile::{NO_IMAGE, NOT_AVAILABLE, NOT_PROVIDED, display_or};
use accountdesk::views::{ProfileTab, ProfileView};
use accountdesk::{ClientError, ClientResult, UploadFile, UserListEntry, UserProfile};
use leptos::ev::{Event, SubmitEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

use crate::auth::{AuthContext, use_auth, use_cancel_token};
use crate::components::banner::{BannerView, FieldHint};

/// 读取用户选中的文件内容
async fn read_file(file: File) -> ClientResult<UploadFile> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ClientError::transport(format!("读取文件失败: {:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(UploadFile::new(file.name(), file.type_(), bytes))
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let cancel = use_cancel_token();
    let state = {
        let api = auth.api();
        RwSignal::new(ProfileView::new(api.session(), api.config().banner_dismiss))
    };

    // 挂载时加载：资料与（管理员）用户列表并发请求
    {
        let api = auth.api();
        let is_admin = state.with_untracked(|v| v.is_admin());
        state.update(|v| v.begin_load());

        let (profile_api, profile_cancel) = (api.clone(), cancel.clone());
        spawn_local(async move {
            let result = profile_api.fetch_profile(&profile_cancel).await;
            state.try_update(|v| v.apply_profile(result));
        });

        if is_admin {
            let cancel = cancel.clone();
            spawn_local(async move {
                let result = api.list_users(&cancel).await;
                state.try_update(|v| v.apply_users(result));
            });
        }
    }

    let on_save = {
        let cancel = cancel.clone();
        Callback::new(move |ev: SubmitEvent| {
            ev.prevent_default();
            let Some(req) = state.try_update(|v| v.begin_save()).flatten() else {
                return;
            };
            let api = auth.api();
            let cancel = cancel.clone();
            spawn_local(async move {
                let result = api.update_profile(&req, &cancel).await;
                state.try_update(|v| v.finish_save(result));
            });
        })
    };

    let on_file = {
        let cancel = cancel.clone();
        Callback::new(move |ev: Event| {
            let file = ev
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            let Some(file) = file else { return };
            if !state.try_update(|v| v.begin_upload()).unwrap_or(false) {
                return;
            }

            let api = auth.api();
            let cancel = cancel.clone();
            spawn_local(async move {
                let result = match read_file(file).await {
                    Ok(upload) => api.upload_profile_picture(upload, &cancel).await,
                    Err(e) => Err(e),
                };
                state.try_update(|v| v.finish_upload(result));
            });
        })
    };

    let on_logout = move |_| logout(auth, state);

    let loading = move || state.with(|v| v.loading);
    let editing = move || state.with(|v| v.edit.is_some());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <span class="text-xl font-bold px-2">"Account"</span>
                        {move || state.with(|v| v.is_admin()).then(|| view! {
                            <span class="badge badge-secondary">"Admin"</span>
                        })}
                    </div>
                    <div class="flex-none">
                        <button on:click=on_logout class="btn btn-outline btn-error">"Logout"</button>
                    </div>
                </div>

                <BannerView
                    banner=Signal::derive(move || state.with(|v| v.banner.clone()))
                    on_dismiss=move |_| state.update(|v| v.dismiss_banner())
                />

                <div role="tablist" class="tabs tabs-boxed bg-base-100">
                    <For
                        each=move || state.with(|v| v.visible_tabs())
                        key=|tab| tab.label()
                        let:tab
                    >
                        <a
                            role="tab"
                            class=move || if state.with(|v| v.tab()) == tab { "tab tab-active" } else { "tab" }
                            on:click=move |_| { state.update(|v| { v.select_tab(tab); }); }
                        >
                            {tab.label()}
                        </a>
                    </For>
                </div>

                <Show when=loading>
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>

                <Show when=move || !loading() && state.with(|v| v.tab()) == ProfileTab::Profile>
                    {move || state.with(|v| v.profile.clone()).map(|profile| {
                        if editing() {
                            view! {
                                <EditForm state on_save on_file />
                            }.into_any()
                        } else {
                            view! {
                                <ProfileCard profile on_edit=move |_| { state.update(|v| { v.start_edit(); }); } />
                            }.into_any()
                        }
                    })}
                </Show>

                <Show when=move || !loading() && state.with(|v| v.tab()) == ProfileTab::Users>
                    <UsersTable users=Signal::derive(move || state.with(|v| v.users.clone())) />
                </Show>
            </div>
        </div>
    }
}

/// 清除会话后写回守卫，路由服务负责跳转到登录页
fn logout(auth: AuthContext, state: RwSignal<ProfileView>) {
    let api = auth.api();
    let mut guard = auth.guard.get_untracked();
    match state.try_update(|v| v.logout(&mut guard, api.session())) {
        Some(Ok(())) => auth.set_guard(guard),
        Some(Err(e)) => {
            tracing::error!(error = %e, "logout failed");
            state.update(|v| {
                v.banner = Some(accountdesk::views::Banner::error(e.user_message("Logout failed")))
            });
        }
        None => {}
    }
}

#[component]
fn ProfileCard(profile: UserProfile, #[prop(into)] on_edit: Callback<()>) -> impl IntoView {
    let row = |label: &'static str, value: String| {
        view! {
            <tr>
                <th class="w-40">{label}</th>
                <td>{value}</td>
            </tr>
        }
    };
    let picture = profile.profile_pic.clone().filter(|p| !p.trim().is_empty());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center gap-4">
                    {match picture {
                        Some(src) => view! {
                            <div class="avatar">
                                <div class="w-20 rounded-full">
                                    <img src=src alt="Profile" />
                                </div>
                            </div>
                        }.into_any(),
                        None => view! { <span class="text-base-content/50">{NO_IMAGE}</span> }.into_any(),
                    }}
                    <div>
                        <h2 class="card-title">{profile.name.clone()}</h2>
                        <span class="badge badge-outline">{profile.role.as_str()}</span>
                    </div>
                </div>
                <table class="table">
                    <tbody>
                        {row("ID", profile.id.clone())}
                        {row("Name", profile.name.clone())}
                        {row("Email", profile.email.clone())}
                        {row("Phone", display_or(profile.phone.as_deref(), NOT_PROVIDED).to_string())}
                        {row("Role", profile.role.as_str().to_string())}
                        {row("Date of Birth", display_or(profile.dob.as_deref(), NOT_PROVIDED).to_string())}
                    </tbody>
                </table>
                <div class="card-actions justify-end">
                    <button class="btn btn-primary" on:click=move |_| on_edit.run(())>"Edit Profile"</button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn EditForm(
    state: RwSignal<ProfileView>,
    on_save: Callback<SubmitEvent>,
    on_file: Callback<Event>,
) -> impl IntoView {
    let input = move |field: Field, label: &'static str, input_type: &'static str| {
        let value = move || {
            state.with(|v| {
                v.edit
                    .as_ref()
                    .map(|d| match field {
                        Field::Name => d.name.clone(),
                        Field::Phone => d.phone.clone(),
                        Field::Dob => d.dob.clone(),
                        Field::ProfilePic => d.profile_pic.clone(),
                        _ => String::new(),
                    })
                    .unwrap_or_default()
            })
        };
        let hint = Signal::derive(move || state.with(|v| v.field_errors.for_field(field).map(str::to_string)));
        view! {
            <div class="form-control">
                <label class="label" for=field.as_str()>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=field.as_str()
                    name=field.as_str()
                    type=input_type
                    on:input=move |ev| state.update(|v| v.edit_field(field, event_target_value(&ev)))
                    prop:value=value
                    class="input input-bordered"
                />
                <FieldHint message=hint />
            </div>
        }
    };

    let saving = move || state.with(|v| v.saving);
    let uploading = move || state.with(|v| v.uploading);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=move |ev| on_save.run(ev) novalidate>
                <h2 class="card-title">"Edit Profile"</h2>
                {input(Field::Name, "Full Name", "text")}
                {input(Field::Phone, "Phone", "tel")}
                {input(Field::Dob, "Date of Birth", "date")}
                {input(Field::ProfilePic, "Profile Picture URL", "text")}

                <div class="form-control">
                    <label class="label" for=Field::File.as_str()>
                        <span class="label-text">"Upload Picture"</span>
                    </label>
                    <input
                        id=Field::File.as_str()
                        name=Field::File.as_str()
                        type="file"
                        accept="image/*"
                        class="file-input file-input-bordered"
                        disabled=uploading
                        on:change=move |ev| on_file.run(ev)
                    />
                </div>

                <div class="card-actions justify-end mt-4">
                    <button type="button" class="btn btn-ghost" on:click=move |_| state.update(|v| v.cancel_edit())>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving() || uploading()>
                        {move || if saving() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[component]
fn UsersTable(#[prop(into)] users: Signal<Vec<UserListEntry>>) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Name"</th>
                                <th>"Email"</th>
                                <th>"Phone"</th>
                                <th>"Role"</th>
                                <th>"DOB"</th>
                                <th>"Profile Pic"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || users.with(|u| u.is_empty())>
                                <tr>
                                    <td colspan="7" class="text-center py-8 text-base-content/50">"No users found."</td>
                                </tr>
                            </Show>
                            <For each=move || users.get() key=|u| u.id.clone() let:user>
                                <tr>
                                    <td>{user.id.clone()}</td>
                                    <td>{user.name.clone()}</td>
                                    <td>{user.email.clone()}</td>
                                    <td>{display_or(user.phone.as_deref(), NOT_AVAILABLE).to_string()}</td>
                                    <td><span class="badge badge-ghost">{user.role.as_str()}</span></td>
                                    <td>{display_or(user.dob.as_deref(), NOT_AVAILABLE).to_string()}</td>
                                    <td>
                                        {match user.profile_pic.clone().filter(|p| !p.trim().is_empty()) {
                                            Some(src) => view! {
                                                <div class="avatar">
                                                    <div class="w-10 rounded-full">
                                                        <img src=src alt="Profile" />
                                                    </div>
                                                </div>
                                            }.into_any(),
                                            None => view! { <span class="text-base-content/50">{NO_IMAGE}</span> }.into_any(),
                                        }}
                                    </td>
                                </tr>
                            </For>
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
