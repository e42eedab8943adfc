use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::{
    expense::{Category, Expense},
    expense_view::{ExpenseViewModel, FetchOutcome},
    filter::FilterPatch,
    format::format_amount,
    sort::{SortDirection, SortKey},
};

use super::{
    icons::icon_refresh,
    notification::{Notice, NotificationBanner},
    use_redraw, AppContext,
};

const INPUT_CLASS: &str = "px-3 py-2 bg-white border border-slate-300 rounded-lg text-sm focus:outline-none focus:ring-2 focus:ring-[#173E63]";

/// Issues a fetch now and redraws when it completes.
fn fetch_now(model: Rc<ExpenseViewModel>, redraw: Callback<()>, on_unauthorized: Callback<()>) {
    let pending = model.refetch();
    redraw.emit(());

    spawn_local(async move {
        settle(pending.await, &on_unauthorized);
        redraw.emit(());
    });
}

/// Fetches once the filter edit `token` belongs to has settled.
fn fetch_when_settled(
    model: Rc<ExpenseViewModel>,
    token: u64,
    redraw: Callback<()>,
    on_unauthorized: Callback<()>,
) {
    spawn_local(async move {
        if model.settled(token).await {
            fetch_now(model, redraw, on_unauthorized);
        }
    });
}

fn settle(outcome: FetchOutcome, on_unauthorized: &Callback<()>) {
    if let FetchOutcome::Failed(failure) = outcome {
        if failure.error().is_unauthorized() {
            on_unauthorized.emit(());
        }
    }
}

fn sort_marker(direction: Option<SortDirection>) -> &'static str {
    match direction {
        Some(SortDirection::Ascending) => " ▲",
        Some(SortDirection::Descending) => " ▼",
        None => "",
    }
}

fn render_row(expense: &Expense, currency_symbol: &str) -> Html {
    html! {
        <tr key={expense.id.to_string()} class="border-b border-slate-100 hover:bg-slate-50">
            <td class="px-4 py-3 font-medium text-[#173E63]">{ expense.business_name.clone() }</td>
            <td class="px-4 py-3">{ expense.transaction_date.to_string() }</td>
            <td class="px-4 py-3 text-right">{ format_amount(&expense.amount_before_vat, currency_symbol) }</td>
            <td class="px-4 py-3 text-right">{ format_amount(&expense.amount_after_vat, currency_symbol) }</td>
            <td class="px-4 py-3">{ expense.category.label() }</td>
            <td class="px-4 py-3">{ expense.invoice_number_display().to_owned() }</td>
        </tr>
    }
}

#[function_component(ExpenseTable)]
pub fn expense_table() -> Html {
    let ctx = use_context::<AppContext>().expect("app context not found");
    let debounce = ctx.config.filter_debounce();
    let model = use_memo(
        move |client| ExpenseViewModel::new(client.clone(), debounce),
        ctx.client.clone(),
    );
    let redraw = use_redraw();

    {
        let model = model.clone();
        let redraw = redraw.clone();
        let on_unauthorized = ctx.on_unauthorized.clone();
        use_effect_with_deps(
            move |_| {
                fetch_now(model, redraw, on_unauthorized);
                || ()
            },
            (),
        );
    }

    let stage = {
        let model = model.clone();
        let redraw = redraw.clone();
        let on_unauthorized = ctx.on_unauthorized.clone();
        Rc::new(move |patch: FilterPatch| {
            let token = model.stage_filter(patch);
            redraw.emit(());
            fetch_when_settled(
                model.clone(),
                token,
                redraw.clone(),
                on_unauthorized.clone(),
            );
        })
    };

    let on_text = |to_patch: fn(String) -> FilterPatch| {
        let stage = stage.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            stage(to_patch(input.value()));
        })
    };
    let on_business_name = on_text(|value| FilterPatch::business_name(value));
    let on_start_date = on_text(|value| FilterPatch::start_date(value));
    let on_end_date = on_text(|value| FilterPatch::end_date(value));
    let on_min_amount = on_text(|value| FilterPatch::min_amount(value));
    let on_max_amount = on_text(|value| FilterPatch::max_amount(value));

    let on_category = {
        let stage = stage.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            stage(FilterPatch::category(Category::from_wire(&select.value())));
        })
    };

    let on_refresh = {
        let model = model.clone();
        let redraw = redraw.clone();
        let on_unauthorized = ctx.on_unauthorized.clone();
        Callback::from(move |_| fetch_now(model.clone(), redraw.clone(), on_unauthorized.clone()))
    };

    let (filter, sort, loading, failure) = model.with_view(|view| {
        (
            view.filter().clone(),
            view.sort(),
            view.is_loading(),
            view.error().cloned(),
        )
    });
    let rows = model.derived_view();
    let currency_symbol = ctx.config.currency_symbol.clone();

    let body = if rows.is_empty() {
        let message = if loading {
            "Loading expenses..."
        } else {
            "No expenses found."
        };
        html! {
            <tr>
                <td colspan={SortKey::ALL.len().to_string()} class="px-4 py-8 text-center text-slate-400">{ message }</td>
            </tr>
        }
    } else {
        rows.iter()
            .map(|expense| render_row(expense, &currency_symbol))
            .collect::<Html>()
    };

    html! {
        <div class="space-y-4">
            <NotificationBanner notice={failure.map(|failure| Notice::error(failure.message()))} />

            <div class="flex flex-wrap items-end gap-3 bg-white rounded-2xl border border-slate-200 p-4">
                <input type="text" placeholder="Business name" class={INPUT_CLASS}
                    value={filter.business_name.clone()} oninput={on_business_name} />
                <select class={INPUT_CLASS} onchange={on_category}>
                    <option value="" selected={filter.category.is_none()}>{"All categories"}</option>
                    { for Category::ALL.into_iter().map(|category| html! {
                        <option value={category.wire_value()} selected={filter.category == Some(category)}>
                            { category.label() }
                        </option>
                    }) }
                </select>
                <label class="flex flex-col text-xs text-slate-500">
                    {"From"}
                    <input type="date" class={INPUT_CLASS} value={filter.start_date.clone()} oninput={on_start_date} />
                </label>
                <label class="flex flex-col text-xs text-slate-500">
                    {"To"}
                    <input type="date" class={INPUT_CLASS} value={filter.end_date.clone()} oninput={on_end_date} />
                </label>
                <input type="number" step="0.01" placeholder="Min amount" class={INPUT_CLASS}
                    value={filter.min_amount.clone()} oninput={on_min_amount} />
                <input type="number" step="0.01" placeholder="Max amount" class={INPUT_CLASS}
                    value={filter.max_amount.clone()} oninput={on_max_amount} />
                <button type="button" class="ml-auto p-2 rounded-lg text-[#173E63] hover:bg-slate-100" aria-label="Refresh" onclick={on_refresh}>
                    { icon_refresh() }
                </button>
            </div>

            <div class="bg-white rounded-2xl border border-slate-200 overflow-x-auto">
                <table class="w-full text-sm">
                    <thead class="bg-[#D8E1E8] text-[#173E63]">
                        <tr>
                            { for SortKey::ALL.into_iter().map(|key| {
                                let model = model.clone();
                                let redraw = redraw.clone();
                                let onclick = Callback::from(move |_| {
                                    model.set_sort(key);
                                    redraw.emit(());
                                });

                                html! {
                                    <th class="px-4 py-3 text-left font-semibold cursor-pointer select-none" onclick={onclick}>
                                        { key.title() }{ sort_marker(sort.direction_of(key)) }
                                    </th>
                                }
                            }) }
                        </tr>
                    </thead>
                    <tbody class={classes!(loading.then_some("opacity-60"))}>
                        { body }
                    </tbody>
                </table>
            </div>
        </div>
    }
}
