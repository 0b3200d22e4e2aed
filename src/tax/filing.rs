//! Form-shaped view of a computed return. The compliance and risk checks
//! operate on this view rather than on engine internals, mirroring what a
//! filed return actually shows.

use crate::forms::{IncomeForm, Taxpayer};
use crate::tax::engine::ComputedReturn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Form 1040 lines the downstream checks care about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Form1040 {
    #[serde(rename = "Line 9")]
    pub total_income: Decimal,
    #[serde(rename = "Line 12")]
    pub deduction: Decimal,
    #[serde(rename = "Line 15")]
    pub taxable_income: Decimal,
}

/// Form 4562, depreciation and amortization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Form4562 {
    #[serde(rename = "Part I Section 179")]
    pub section179: Decimal,
    #[serde(rename = "Part II Bonus Depreciation")]
    pub bonus: Decimal,
}

/// Schedule C summary line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleCForm {
    #[serde(rename = "Net Profit")]
    pub net_profit: Decimal,
}

/// Schedule SE summary line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSeForm {
    #[serde(rename = "Line 12")]
    pub se_tax: Decimal,
}

/// The set of forms a return files. Optional forms are absent when the
/// underlying activity is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnForms {
    pub form_1040: Form1040,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_4562: Option<Form4562>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_c: Option<ScheduleCForm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_se: Option<ScheduleSeForm>,
}

/// Project a computed return onto the forms it would file. Form 4562 is
/// attached when any asset was depreciated, Schedule C when one was filed,
/// Schedule SE when SE tax is due.
pub fn build_return_forms(taxpayer: &Taxpayer, ret: &ComputedReturn) -> ReturnForms {
    let form_4562 = (!taxpayer.assets.is_empty()).then(|| Form4562 {
        section179: ret.depreciation.federal_section179(),
        bonus: ret.depreciation.federal_bonus(),
    });

    let filed_schedule_c = taxpayer
        .forms
        .iter()
        .any(|f| matches!(f, IncomeForm::ScheduleC { .. }));
    let schedule_c = filed_schedule_c.then(|| ScheduleCForm {
        net_profit: ret.income.business_income,
    });

    let schedule_se = (ret.se_tax.tax > Decimal::ZERO).then(|| ScheduleSeForm {
        se_tax: ret.se_tax.tax,
    });

    ReturnForms {
        form_1040: Form1040 {
            total_income: ret.total_income,
            deduction: ret.deductions.deduction_taken,
            taxable_income: ret.taxable_income,
        },
        form_4562,
        schedule_c,
        schedule_se,
    }
}
