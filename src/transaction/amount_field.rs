//! The amount field of the new transaction form.
//!
//! The field is re-rendered by the server on every keystroke so that the
//! digits are grouped as the user types and the submit button is only enabled
//! once the amount is above zero.

use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    currency::AmountInput,
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, submit_button},
};

const AMOUNT_FIELD_ID: &str = "amount-field";
const SUBMIT_CONTAINER_ID: &str = "submit-container";

/// The amount field, pre-filled with the normalised `amount`.
pub(super) fn amount_field(amount: &AmountInput) -> Markup {
    html! {
        div id=(AMOUNT_FIELD_ID)
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Nominal"
            }

            div class="flex items-center gap-2"
            {
                span class="text-2xl font-bold text-gray-500 dark:text-gray-400" { "Rp" }

                input
                    name="amount"
                    id="amount"
                    type="text"
                    inputmode="numeric"
                    autocomplete="off"
                    placeholder="0"
                    value=(amount.display)
                    required
                    autofocus
                    hx-post=(endpoints::AMOUNT_FIELD_API)
                    hx-trigger="input changed delay:150ms"
                    hx-target={ "#" (AMOUNT_FIELD_ID) }
                    hx-swap="outerHTML"
                    class={ (FORM_TEXT_INPUT_STYLE) " text-2xl font-bold tracking-tight" };
            }
        }
    }
}

/// The submit button for the form, disabled until `amount` can be saved.
///
/// Set `swap_out_of_band` when rendering the button into a response for the
/// amount field.
pub(super) fn save_button(amount: &AmountInput, swap_out_of_band: bool) -> Markup {
    html! {
        div id=(SUBMIT_CONTAINER_ID) hx-swap-oob=[swap_out_of_band.then_some("true")]
        {
            (submit_button("submit-button", "Simpan", "Menyimpan...", !amount.is_valid()))
        }
    }
}

/// The form data sent by the amount field.
#[derive(Debug, Deserialize)]
pub struct AmountFieldForm {
    /// Whatever the user has typed so far.
    #[serde(default)]
    pub amount: String,
}

/// A route handler that normalises the typed amount.
///
/// Responds with the amount field and an out-of-band swap for the submit
/// button.
pub async fn post_amount_field(Form(form): Form<AmountFieldForm>) -> Markup {
    let amount = AmountInput::parse(&form.amount);

    html! {
        (amount_field(&amount))
        (save_button(&amount, true))
    }
}
