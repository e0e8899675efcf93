use serde::{Deserialize, Serialize};

/// Loan parameters in whole currency units and years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub price: f64,
    pub down_payment: f64,
    pub term_years: f64,
    pub annual_rate_percent: f64,
}

impl MortgageInputs {
    pub fn loan_amount(&self) -> f64 {
        self.price - self.down_payment
    }
}

/// Derived amortization figures. Raw values stay unrounded; [`Self::rounded`]
/// produces the whole-unit view shown to visitors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MortgageQuote {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub overpayment: f64,
}

impl MortgageQuote {
    pub fn rounded(&self) -> MortgageQuoteView {
        MortgageQuoteView {
            loan_amount: self.loan_amount.round() as i64,
            monthly_payment: self.monthly_payment.round() as i64,
            total_payment: self.total_payment.round() as i64,
            overpayment: self.overpayment.round() as i64,
        }
    }
}

/// Display payload with every monetary output rounded to the nearest whole
/// currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MortgageQuoteView {
    pub loan_amount: i64,
    pub monthly_payment: i64,
    pub total_payment: i64,
    pub overpayment: i64,
}

/// Standard fixed-rate amortization. Returns `None` instead of an error when
/// the inputs cannot form a loan; the calculator keeps showing its previous
/// quote in that case.
pub fn estimate(inputs: &MortgageInputs) -> Option<MortgageQuote> {
    let loan_amount = inputs.loan_amount();
    if loan_amount <= 0.0 || inputs.annual_rate_percent <= 0.0 || inputs.term_years <= 0.0 {
        return None;
    }

    let monthly_rate = inputs.annual_rate_percent / 100.0 / 12.0;
    let total_months = inputs.term_years * 12.0;
    let growth = (1.0 + monthly_rate).powf(total_months);

    let monthly_payment = loan_amount * monthly_rate * growth / (growth - 1.0);
    let total_payment = monthly_payment * total_months;

    Some(MortgageQuote {
        loan_amount,
        monthly_payment,
        total_payment,
        overpayment: total_payment - loan_amount,
    })
}

/// Default share of the price used when the down payment has to be reset.
const DEFAULT_DOWN_PAYMENT_SHARE: f64 = 0.20;

/// Interactive calculator front: recomputes on every input change and never
/// surfaces an error to the form. Invalid input leaves the previous quote on
/// screen.
#[derive(Debug, Clone)]
pub struct MortgageCalculator {
    inputs: MortgageInputs,
    quote: Option<MortgageQuote>,
}

impl MortgageCalculator {
    pub fn new(inputs: MortgageInputs) -> Self {
        let mut calculator = Self {
            inputs,
            quote: None,
        };
        calculator.recompute();
        calculator
    }

    pub fn inputs(&self) -> MortgageInputs {
        self.inputs
    }

    pub fn quote(&self) -> Option<MortgageQuote> {
        self.quote
    }

    /// A price drop below the current down payment resets the down payment to
    /// the default share of the new price; the down payment can never exceed
    /// the price.
    pub fn set_price(&mut self, price: f64) {
        self.inputs.price = price;
        if self.inputs.down_payment > price {
            self.inputs.down_payment = price * DEFAULT_DOWN_PAYMENT_SHARE;
        }
        self.recompute();
    }

    pub fn set_down_payment(&mut self, down_payment: f64) {
        self.inputs.down_payment = down_payment.min(self.inputs.price);
        self.recompute();
    }

    pub fn set_term_years(&mut self, term_years: f64) {
        self.inputs.term_years = term_years;
        self.recompute();
    }

    pub fn set_annual_rate_percent(&mut self, annual_rate_percent: f64) {
        self.inputs.annual_rate_percent = annual_rate_percent;
        self.recompute();
    }

    fn recompute(&mut self) {
        if let Some(quote) = estimate(&self.inputs) {
            self.quote = Some(quote);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_inputs() -> MortgageInputs {
        MortgageInputs {
            price: 5_000_000.0,
            down_payment: 1_000_000.0,
            term_years: 20.0,
            annual_rate_percent: 12.0,
        }
    }

    #[test]
    fn amortization_matches_documented_example() {
        let quote = estimate(&standard_inputs()).expect("valid inputs produce a quote");
        let view = quote.rounded();

        assert_eq!(view.loan_amount, 4_000_000);
        assert_eq!(view.monthly_payment, 44_043);
        assert_eq!(view.total_payment, 10_570_427);
        assert_eq!(view.overpayment, 6_570_427);
    }

    #[test]
    fn degenerate_inputs_yield_no_quote() {
        let mut inputs = standard_inputs();
        inputs.down_payment = inputs.price;
        assert!(estimate(&inputs).is_none());

        let mut inputs = standard_inputs();
        inputs.annual_rate_percent = 0.0;
        assert!(estimate(&inputs).is_none());

        let mut inputs = standard_inputs();
        inputs.term_years = 0.0;
        assert!(estimate(&inputs).is_none());
    }

    #[test]
    fn invalid_input_retains_previous_quote() {
        let mut calculator = MortgageCalculator::new(standard_inputs());
        let before = calculator.quote().expect("initial quote");

        calculator.set_annual_rate_percent(0.0);
        let after = calculator.quote().expect("quote retained");
        assert_eq!(before, after);

        calculator.set_annual_rate_percent(10.0);
        let refreshed = calculator.quote().expect("quote recomputed");
        assert!(refreshed.monthly_payment < before.monthly_payment);
    }

    #[test]
    fn price_drop_resets_down_payment_to_default_share() {
        let mut calculator = MortgageCalculator::new(MortgageInputs {
            price: 5_000_000.0,
            down_payment: 4_800_000.0,
            term_years: 15.0,
            annual_rate_percent: 10.0,
        });

        calculator.set_price(1_000_000.0);
        let inputs = calculator.inputs();
        assert_eq!(inputs.down_payment, 200_000.0);
        assert!(inputs.down_payment < inputs.price);
    }

    #[test]
    fn down_payment_clamps_to_price() {
        let mut calculator = MortgageCalculator::new(standard_inputs());
        calculator.set_down_payment(9_999_999.0);
        assert_eq!(calculator.inputs().down_payment, 5_000_000.0);
    }
}
