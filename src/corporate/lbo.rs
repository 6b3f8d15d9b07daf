//! Leveraged-buyout structure: capital stack, debt amortization, and
//! exit proceeds.

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// Funding sources must match the purchase price within one currency unit.
const CAPITAL_STRUCTURE_TOLERANCE: f64 = 1.0;

/// Snapshot of the deal's funding mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructure {
    pub equity: f64,
    pub debt: f64,
    pub total: f64,
    pub equity_ratio: f64,
    pub debt_ratio: f64,
    /// 0.0 when the equity contribution is zero.
    pub debt_to_equity: f64,
}

/// One period of the debt amortization schedule.
///
/// When the scheduled payment does not cover interest the principal
/// repayment is floored at zero and `payment_covers_interest` is false;
/// the caller decides how to react. Nothing is logged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtScheduleRow {
    pub year: usize,
    pub beginning_debt: f64,
    pub interest_expense: f64,
    pub principal_repayment: f64,
    pub ending_debt: f64,
    pub payment_covers_interest: bool,
}

/// Cash returned to equity at exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitProceeds {
    pub exit_enterprise_value: f64,
    pub debt_repayment: f64,
    pub transaction_costs: f64,
    pub equity_proceeds: f64,
}

/// Leveraged-buyout transaction model.
///
/// # Examples
/// ```
/// use ferroquant::corporate::lbo::LboModel;
///
/// let lbo = LboModel::new(1_000.0e6, 300.0e6, 700.0e6, 0.06, 5).unwrap();
/// let structure = lbo.capital_structure();
/// assert!((structure.debt_ratio - 0.7).abs() < 1.0e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LboModel {
    purchase_price: f64,
    equity_contribution: f64,
    debt_amount: f64,
    interest_rate: f64,
    loan_term: usize,
}

impl LboModel {
    /// # Errors
    /// `InvalidParameter` when the purchase price is non-positive, either
    /// funding leg is negative, or equity + debt differs from the purchase
    /// price by more than one currency unit.
    pub fn new(
        purchase_price: f64,
        equity_contribution: f64,
        debt_amount: f64,
        interest_rate: f64,
        loan_term: usize,
    ) -> Result<Self, EngineError> {
        if !purchase_price.is_finite()
            || !equity_contribution.is_finite()
            || !debt_amount.is_finite()
            || !interest_rate.is_finite()
        {
            return Err(EngineError::InvalidParameter(
                "LBO inputs must be finite".to_string(),
            ));
        }
        if purchase_price <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "purchase price must be > 0, got {purchase_price}"
            )));
        }
        if equity_contribution < 0.0 || debt_amount < 0.0 {
            return Err(EngineError::InvalidParameter(
                "equity and debt must be >= 0".to_string(),
            ));
        }
        let gap = (equity_contribution + debt_amount - purchase_price).abs();
        if gap > CAPITAL_STRUCTURE_TOLERANCE {
            return Err(EngineError::InvalidParameter(format!(
                "equity + debt must equal the purchase price (off by {gap:.2})"
            )));
        }

        Ok(Self {
            purchase_price,
            equity_contribution,
            debt_amount,
            interest_rate,
            loan_term,
        })
    }

    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    pub fn equity_contribution(&self) -> f64 {
        self.equity_contribution
    }

    pub fn debt_amount(&self) -> f64 {
        self.debt_amount
    }

    /// Funding mix ratios.
    pub fn capital_structure(&self) -> CapitalStructure {
        let total = self.equity_contribution + self.debt_amount;
        CapitalStructure {
            equity: self.equity_contribution,
            debt: self.debt_amount,
            total,
            equity_ratio: self.equity_contribution / total,
            debt_ratio: self.debt_amount / total,
            debt_to_equity: if self.equity_contribution > 0.0 {
                self.debt_amount / self.equity_contribution
            } else {
                0.0
            },
        }
    }

    /// Amortization schedule over the loan term for a fixed annual
    /// payment. Interest accrues on the remaining balance; principal is
    /// whatever the payment leaves after interest, capped by the balance.
    pub fn debt_schedule(&self, annual_repayment: f64) -> Vec<DebtScheduleRow> {
        let mut schedule = Vec::with_capacity(self.loan_term);
        let mut remaining = self.debt_amount;

        for year in 1..=self.loan_term {
            let beginning_debt = remaining;
            let interest_expense = remaining * self.interest_rate;
            let covers_interest = annual_repayment >= interest_expense;
            let principal_repayment = if covers_interest {
                (annual_repayment - interest_expense).min(remaining)
            } else {
                0.0
            };
            remaining -= principal_repayment;

            schedule.push(DebtScheduleRow {
                year,
                beginning_debt,
                interest_expense,
                principal_repayment,
                ending_debt: remaining,
                payment_covers_interest: covers_interest,
            });
        }

        schedule
    }

    /// Equity proceeds at exit: enterprise value less remaining debt and
    /// transaction costs.
    pub fn exit_proceeds(
        &self,
        exit_enterprise_value: f64,
        remaining_debt: f64,
        transaction_costs: f64,
    ) -> ExitProceeds {
        ExitProceeds {
            exit_enterprise_value,
            debt_repayment: remaining_debt,
            transaction_costs,
            equity_proceeds: exit_enterprise_value - remaining_debt - transaction_costs,
        }
    }
}
