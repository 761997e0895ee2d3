//! Defines the route handler for the page for recording a new transaction.

use maud::{Markup, html};

use crate::{
    currency::AmountInput,
    endpoints,
    html::{
        FORM_CONTAINER_STYLE, FORM_HINT_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, link,
    },
    transaction::amount_field::{amount_field, save_button},
};

fn transaction_type_fields() -> Markup {
    html! {
        fieldset class="group space-y-2"
        {
            legend class="sr-only" { "Jenis catatan" }

            div class="grid grid-cols-2 gap-2"
            {
                div
                {
                    input
                        name="type_"
                        id="type-expense"
                        type="radio"
                        value="expense"
                        checked
                        required
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "− Pengeluaran"
                    }
                }

                div
                {
                    input
                        name="type_"
                        id="type-income"
                        type="radio"
                        value="income"
                        required
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "+ Pemasukan"
                    }
                }
            }

            p class={ "text-center " (FORM_HINT_STYLE) }
            {
                span class="group-has-[#type-income:checked]:hidden" { "Pengeluaran hari ini" }
                span class="hidden group-has-[#type-income:checked]:inline" { "Pemasukan hari ini" }
            }
        }
    }
}

fn new_transaction_view() -> Markup {
    let empty_amount = AmountInput::parse("");

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    h2 class="text-xl font-bold" { "Tambah Catatan" }
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Catat pemasukan atau pengeluaran hari ini."
                    }
                }

                (transaction_type_fields())

                (amount_field(&empty_amount))

                div
                {
                    label
                        for="category"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Kategori"
                    }

                    input
                        name="category"
                        id="category"
                        type="text"
                        placeholder="Makan, transport, gaji, dll"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="note"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Catatan (opsional)"
                    }

                    textarea
                        name="note"
                        id="note"
                        rows="2"
                        placeholder="Tambahan info kalau perlu"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {}
                }

                (save_button(&empty_amount, false))

                p class="text-sm text-center text-gray-500 dark:text-gray-400"
                {
                    (link(endpoints::DASHBOARD_VIEW, "Kembali"))
                }
            }
        }
    };

    base("Tambah Catatan", &content)
}

/// Renders the page for recording a transaction.
pub async fn get_new_transaction_page() -> Markup {
    new_transaction_view()
}

#[cfg(test)]
mod view_tests {
    use axum::response::IntoResponse;
    use scraper::{ElementRef, Selector};

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_new_transaction_page;

    #[tokio::test]
    async fn new_transaction_returns_form() {
        let response = get_new_transaction_page().await.into_response();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_hx_endpoint(&form, "#alert-container", "hx-target-error");
        assert_form_input(&form, "type_", "radio");
        assert_form_input(&form, "amount", "text");
        assert_form_submit_button(&form);
        assert_optional_field(&form, "input[name=category]");
        assert_optional_field(&form, "textarea[name=note]");
    }

    #[tokio::test]
    async fn expense_is_selected_by_default() {
        let response = get_new_transaction_page().await.into_response();
        let document = parse_html_document(response).await;

        let checked = document
            .select(&Selector::parse("input[name=type_][checked]").unwrap())
            .map(|input| input.value().attr("value").unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(checked, vec!["expense"]);
    }

    #[tokio::test]
    async fn amount_field_posts_to_normaliser() {
        let response = get_new_transaction_page().await.into_response();
        let document = parse_html_document(response).await;

        let amount = document
            .select(&Selector::parse("input#amount").unwrap())
            .next()
            .expect("No amount input found");
        assert_hx_endpoint(&amount, endpoints::AMOUNT_FIELD_API, "hx-post");
        assert_eq!(amount.value().attr("inputmode"), Some("numeric"));
    }

    #[tokio::test]
    async fn submit_starts_disabled() {
        let response = get_new_transaction_page().await.into_response();
        let document = parse_html_document(response).await;

        let button = document
            .select(&Selector::parse("button#submit-button").unwrap())
            .next()
            .expect("No submit button found");
        assert!(button.value().attr("disabled").is_some());
    }

    #[track_caller]
    fn assert_optional_field(form: &ElementRef<'_>, selector: &str) {
        let field = form
            .select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No field matching {selector}"));

        assert!(
            field.value().attr("required").is_none(),
            "want {selector} to be optional"
        );
    }
}
