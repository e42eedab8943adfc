use yew::prelude::*;

use crate::navigation::Tab;

use super::{
    expense_table::ExpenseTable,
    icons::{icon_log_out, icon_table, icon_upload},
    invoice_upload::InvoiceUpload,
};

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub tab: Tab,
    pub on_navigate: Callback<Tab>,
    pub on_logout: Callback<()>,
}

fn tab_icon(tab: Tab) -> Html {
    match tab {
        Tab::Upload => icon_upload(),
        Tab::Manage => icon_table(),
    }
}

#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let content = match props.tab {
        Tab::Upload => html! { <InvoiceUpload /> },
        Tab::Manage => html! { <ExpenseTable /> },
    };

    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_| on_logout.emit(()))
    };

    html! {
        <div class="flex h-screen bg-background">
            <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
                <div class="px-2 mb-8">
                    <span class="text-[#173E63] text-2xl font-black tracking-tight">{"Invoices"}</span>
                </div>

                <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                    <nav class="flex-1 space-y-2">
                        { for Tab::ALL.into_iter().map(|tab| {
                            let class_name = if tab == props.tab {
                                "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                            } else {
                                "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                            };
                            let on_navigate = props.on_navigate.clone();

                            html! {
                                <button type="button" class={class_name} onclick={Callback::from(move |_| on_navigate.emit(tab))}>
                                    <span class="shrink-0">{ tab_icon(tab) }</span>
                                    <span class="truncate whitespace-nowrap text-left">{ tab.title() }</span>
                                </button>
                            }
                        }) }
                    </nav>

                    <div class="mt-auto pt-4">
                        <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                            { icon_log_out() }
                            <span>{"Log Out"}</span>
                        </button>
                    </div>
                </div>
            </div>

            <main class="flex-1 overflow-y-auto p-8">
                <h1 class="text-2xl font-bold text-[#173E63] mb-6">{ props.tab.title() }</h1>
                { content }
            </main>
        </div>
    }
}
