use js_sys::Uint8Array;
use log::warn;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use crate::{
    expense::{Category, NOT_AVAILABLE},
    format::format_amount,
    upload::{Refusal, SubmitOutcome, UploadController, UploadFile, UploadReceipt},
};

use super::{
    icons::icon_file,
    notification::{Notice, NotificationBanner},
    use_redraw, AppContext,
};

async fn read_file(file: File) -> Result<UploadFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|error| format!("{:?}", error))?;
    let bytes = Uint8Array::new(&buffer).to_vec();

    Ok(UploadFile::new(file.name(), file.type_(), bytes))
}

fn describe(receipt: &UploadReceipt, currency_symbol: &str) -> String {
    let business = receipt.business_name.as_deref().unwrap_or(NOT_AVAILABLE);
    let amount = receipt
        .amount
        .as_ref()
        .map(|amount| format_amount(amount, currency_symbol))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned());
    let date = receipt.date.as_deref().unwrap_or(NOT_AVAILABLE);

    format!("Analysis complete! {business}, {amount}, {date}")
}

#[function_component(InvoiceUpload)]
pub fn invoice_upload() -> Html {
    let ctx = use_context::<AppContext>().expect("app context not found");
    let controller = use_memo(
        |client| UploadController::new(client.clone()),
        ctx.client.clone(),
    );
    let notice = use_state(|| None::<Notice>);
    let redraw = use_redraw();

    let on_file = {
        let controller = controller.clone();
        let notice = notice.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            // Picking the same file again must fire `change` again.
            input.set_value("");

            let controller = controller.clone();
            let notice = notice.clone();
            let redraw = redraw.clone();
            spawn_local(async move {
                match read_file(file).await {
                    Ok(file) => {
                        controller.select_file(file);
                        notice.set(None);
                    }
                    Err(error) => {
                        warn!("could not read the selected file: {error}");
                        notice.set(Some(Notice::error("Could not read the selected file.")));
                    }
                }
                redraw.emit(());
            });
        })
    };

    let on_submit = {
        let controller = controller.clone();
        let notice = notice.clone();
        let redraw = redraw.clone();
        let ctx = ctx.clone();
        Callback::from(move |_| {
            let pending = controller.submit();
            notice.set(None);
            redraw.emit(());

            let notice = notice.clone();
            let redraw = redraw.clone();
            let ctx = ctx.clone();
            spawn_local(async move {
                match pending.await {
                    SubmitOutcome::Completed(receipt) => {
                        notice.set(Some(Notice::success(describe(
                            &receipt,
                            &ctx.config.currency_symbol,
                        ))));
                    }
                    SubmitOutcome::Failed(failure) => {
                        if failure.error().is_unauthorized() {
                            ctx.on_unauthorized.emit(());
                        }
                        notice.set(Some(Notice::error(failure.message())));
                    }
                    SubmitOutcome::Refused(Refusal::NothingStaged) => {
                        notice.set(Some(Notice::error("Choose an invoice file first.")));
                    }
                    SubmitOutcome::Refused(Refusal::AlreadySubmitting) => {}
                }
                redraw.emit(());
            });
        })
    };

    let on_dismiss = {
        let notice = notice.clone();
        Callback::from(move |_| notice.set(None))
    };

    let (staged_name, selected, submitting, can_submit) = controller.with_state(|state| {
        (
            state.staged_file().map(|file| file.name.clone()),
            state.category(),
            state.is_submitting(),
            state.can_submit(),
        )
    });

    html! {
        <div class="max-w-2xl space-y-6">
            <NotificationBanner notice={(*notice).clone()} on_dismiss={on_dismiss} />

            <label class="flex flex-col items-center justify-center gap-3 w-full h-48 border-2 border-dashed border-slate-300 rounded-2xl bg-white cursor-pointer hover:bg-slate-50">
                { icon_file() }
                <span class="text-sm text-slate-500">
                    { staged_name.unwrap_or_else(|| "Choose a PDF or image of the invoice".to_owned()) }
                </span>
                <input type="file" accept=".pdf,image/*" class="hidden" onchange={on_file} />
            </label>

            <div class="space-y-2">
                <p class="text-sm font-medium text-[#173E63]">{"Category"}</p>
                <div class="flex flex-wrap gap-2">
                    { for Category::ALL.into_iter().map(|category| {
                        let class_name = if category == selected {
                            "px-4 py-2 rounded-full text-sm font-medium bg-[#173E63] text-white"
                        } else {
                            "px-4 py-2 rounded-full text-sm font-medium bg-[#D8E1E8] text-[#173E63] hover:bg-[#B2CBDE]"
                        };
                        let controller = controller.clone();
                        let redraw = redraw.clone();
                        let onclick = Callback::from(move |_| {
                            controller.select_category(category);
                            redraw.emit(());
                        });

                        html! {
                            <button type="button" class={class_name} onclick={onclick}>{ category.label() }</button>
                        }
                    }) }
                </div>
            </div>

            <button
                type="button"
                class="w-full bg-[#173E63] text-white py-3 rounded-xl font-semibold hover:opacity-90 transition-opacity disabled:opacity-50"
                disabled={!can_submit}
                onclick={on_submit}
            >
                { if submitting { "Analyzing invoice..." } else { "Upload and analyze" } }
            </button>
        </div>
    }
}
