// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The journal engine. A draft passes validation as a whole or not at all,
//! and posting writes the transaction, its lines, and every touched
//! account balance inside one storage transaction. Builders produce
//! already-balanced drafts; the engine validates them generically and
//! never special-cases a builder.

use crate::chart::codes;
use crate::errors::LedgerError;
use crate::models::{Draft, JournalLine, PayMethod, Settlement, Transaction, TxnKind};
use crate::period::Period;
use crate::store;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Debit/credit totals may disagree by display rounding; anything beyond
/// this is a genuine imbalance. One constant for every check site.
pub static BALANCE_TOLERANCE: Lazy<Decimal> = Lazy::new(|| Decimal::new(1, 2));

fn gen_reference(kind: TxnKind) -> String {
    let ts = chrono::Utc::now().timestamp_millis();
    format!("{}-{:06}", kind.reference_prefix(), ts % 1_000_000)
}

fn tender_account(method: PayMethod, on_account: &'static str) -> &'static str {
    match method {
        PayMethod::Cash => codes::CASH,
        PayMethod::Bank => codes::BANK,
        PayMethod::Credit => on_account,
    }
}

/// Percent-of-net tax, rounded to cents.
fn tax_on(net: Decimal, rate: Decimal) -> Decimal {
    (net * rate / Decimal::ONE_HUNDRED).round_dp(2)
}

fn require_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    Ok(())
}

fn require_non_negative(amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    Ok(())
}

// ------------------------------------------------------------- validation

/// Draft -> Validated. Order matters: period, account existence, line
/// shape, balance, line count. The first failure is returned as-is and
/// nothing is written.
pub fn validate(conn: &Connection, period: &Period, draft: &Draft) -> Result<(), LedgerError> {
    period.check_date(draft.date)?;

    for line in &draft.lines {
        if store::get_account(conn, &line.account_code)?.is_none() {
            return Err(LedgerError::UnknownAccount(line.account_code.clone()));
        }
    }

    for (index, line) in draft.lines.iter().enumerate() {
        let debit_side = line.debit > Decimal::ZERO && line.credit.is_zero();
        let credit_side = line.credit > Decimal::ZERO && line.debit.is_zero();
        if !(debit_side || credit_side) {
            return Err(LedgerError::MalformedLine { index });
        }
    }

    let total_debit: Decimal = draft.lines.iter().map(|l| l.debit).sum();
    let total_credit: Decimal = draft.lines.iter().map(|l| l.credit).sum();
    let difference = total_debit - total_credit;
    if difference.abs() > *BALANCE_TOLERANCE {
        return Err(LedgerError::Unbalanced { difference });
    }

    let mut accounts: Vec<&str> = draft.lines.iter().map(|l| l.account_code.as_str()).collect();
    accounts.sort_unstable();
    accounts.dedup();
    if draft.lines.len() < 2 || accounts.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    Ok(())
}

// ---------------------------------------------------------------- posting

/// Writes one validated draft: transaction row, lines, and the per-line
/// balance deltas. Must run inside an open storage transaction.
fn apply(conn: &Connection, draft: Draft) -> Result<Transaction, LedgerError> {
    let reference = draft
        .reference
        .unwrap_or_else(|| gen_reference(draft.kind));
    let id = store::insert_transaction(conn, draft.date, draft.kind, &reference, &draft.description)?;

    let mut lines = Vec::with_capacity(draft.lines.len());
    for mut line in draft.lines {
        if line.description.is_none() {
            line.description = Some(draft.description.clone());
        }
        store::insert_line(conn, id, &line)?;

        let mut account = store::get_account(conn, &line.account_code)?
            .ok_or_else(|| LedgerError::UnknownAccount(line.account_code.clone()))?;
        account.balance += line.debit - line.credit;
        store::save_account(conn, &account)?;
        lines.push(line);
    }

    Ok(Transaction {
        id,
        date: draft.date,
        kind: draft.kind,
        reference,
        description: draft.description,
        lines,
    })
}

/// Validate and post atomically. On rejection all state is untouched; on
/// storage failure mid-post the transaction rolls back as a unit.
pub fn post(conn: &mut Connection, period: &Period, draft: Draft) -> Result<Transaction, LedgerError> {
    validate(conn, period, &draft)?;
    let tx = conn.transaction()?;
    let posted = apply(&tx, draft)?;
    tx.commit()?;
    Ok(posted)
}

// ---------------------------------------------------- quick-entry drafts

/// Cash-in template: debit the till, credit a source account (sales by
/// default).
pub fn quick_receipt(
    date: NaiveDate,
    amount: Decimal,
    method: PayMethod,
    source: Option<&str>,
    description: Option<String>,
) -> Result<Draft, LedgerError> {
    require_positive(amount)?;
    let source = source.unwrap_or(codes::SALES);
    Ok(Draft::new(date, TxnKind::Receipt, description.unwrap_or_else(|| "Cash receipt".into()))
        .line(JournalLine::debit(tender_account(method, codes::CASH), amount))
        .line(JournalLine::credit(source, amount)))
}

/// Cash-out template: debit an expense account, credit the till.
pub fn quick_payment(
    date: NaiveDate,
    amount: Decimal,
    method: PayMethod,
    expense: Option<&str>,
    description: Option<String>,
) -> Result<Draft, LedgerError> {
    require_positive(amount)?;
    let expense = expense.unwrap_or(codes::GENERAL_EXPENSES);
    Ok(Draft::new(date, TxnKind::Payment, description.unwrap_or_else(|| "Cash payment".into()))
        .line(JournalLine::debit(expense, amount))
        .line(JournalLine::credit(tender_account(method, codes::CASH), amount)))
}

/// Movement between two balance-sheet accounts, till to bank by default.
pub fn quick_transfer(
    date: NaiveDate,
    amount: Decimal,
    from: Option<&str>,
    to: Option<&str>,
    description: Option<String>,
) -> Result<Draft, LedgerError> {
    require_positive(amount)?;
    let from = from.unwrap_or(codes::CASH);
    let to = to.unwrap_or(codes::BANK);
    Ok(Draft::new(date, TxnKind::Transfer, description.unwrap_or_else(|| "Transfer".into()))
        .line(JournalLine::debit(to, amount))
        .line(JournalLine::credit(from, amount)))
}

/// Collection against a customer balance: cash/bank in, receivable down.
pub fn customer_collection(
    date: NaiveDate,
    amount: Decimal,
    method: PayMethod,
    customer: &str,
    reference: Option<String>,
) -> Result<Draft, LedgerError> {
    require_positive(amount)?;
    let description = format!("Collection from {}", customer);
    Ok(Draft::new(date, TxnKind::Receipt, description)
        .with_reference(reference)
        .line(JournalLine::debit(tender_account(method, codes::CASH), amount))
        .line(JournalLine::credit(codes::RECEIVABLE, amount)))
}

/// Settlement of a supplier balance: payable down, cash/bank out.
pub fn supplier_payment(
    date: NaiveDate,
    amount: Decimal,
    method: PayMethod,
    supplier: &str,
    reference: Option<String>,
) -> Result<Draft, LedgerError> {
    require_positive(amount)?;
    let description = format!("Payment to {}", supplier);
    Ok(Draft::new(date, TxnKind::Payment, description)
        .with_reference(reference)
        .line(JournalLine::debit(codes::PAYABLE, amount))
        .line(JournalLine::credit(tender_account(method, codes::CASH), amount)))
}

// --------------------------------------------------- sale/purchase drafts

pub struct SaleParams {
    pub date: NaiveDate,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    /// Percent applied to the discounted subtotal.
    pub tax_rate: Decimal,
    /// Cost of the goods sold; zero skips the COGS/inventory pair.
    pub cogs: Decimal,
    pub method: PayMethod,
}

/// A point-of-sale checkout. The tender line carries the full amount due;
/// a discount is a debit against the contra-revenue account so the entry
/// balances with revenue credited at the undiscounted subtotal.
pub fn pos_sale(p: SaleParams) -> Result<Draft, LedgerError> {
    require_positive(p.subtotal)?;
    require_non_negative(p.discount)?;
    require_non_negative(p.tax_rate)?;
    require_non_negative(p.cogs)?;
    let net = p.subtotal - p.discount;
    require_positive(net)?;
    let tax = tax_on(net, p.tax_rate);
    let total = net + tax;

    let description = p
        .description
        .unwrap_or_else(|| "Point-of-sale checkout".into());
    let mut draft = Draft::new(p.date, TxnKind::Sale, description)
        .with_reference(p.reference)
        .line(JournalLine::debit(tender_account(p.method, codes::RECEIVABLE), total));
    if p.discount > Decimal::ZERO {
        draft = draft.line(JournalLine::debit(codes::SALES_DISCOUNTS, p.discount));
    }
    draft = draft.line(JournalLine::credit(codes::SALES, p.subtotal));
    if tax > Decimal::ZERO {
        draft = draft.line(JournalLine::credit(codes::OUTPUT_TAX, tax));
    }
    if p.cogs > Decimal::ZERO {
        draft = draft
            .line(JournalLine::debit(codes::COGS, p.cogs))
            .line(JournalLine::credit(codes::INVENTORY, p.cogs));
    }
    Ok(draft)
}

pub struct PurchaseParams {
    pub date: NaiveDate,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax_rate: Decimal,
    pub method: PayMethod,
}

/// Goods received: inventory in at the undiscounted subtotal, input tax
/// reclaimable, the discount credited back, cash/payable out for the
/// amount actually due.
pub fn purchase(p: PurchaseParams) -> Result<Draft, LedgerError> {
    require_positive(p.subtotal)?;
    require_non_negative(p.discount)?;
    require_non_negative(p.tax_rate)?;
    let net = p.subtotal - p.discount;
    require_positive(net)?;
    let tax = tax_on(net, p.tax_rate);
    let total = net + tax;

    let description = p.description.unwrap_or_else(|| "Goods purchase".into());
    let mut draft = Draft::new(p.date, TxnKind::Purchase, description)
        .with_reference(p.reference)
        .line(JournalLine::credit(tender_account(p.method, codes::PAYABLE), total))
        .line(JournalLine::debit(codes::INVENTORY, p.subtotal));
    if p.discount > Decimal::ZERO {
        draft = draft.line(JournalLine::credit(codes::SALES_DISCOUNTS, p.discount));
    }
    if tax > Decimal::ZERO {
        draft = draft.line(JournalLine::debit(codes::INPUT_TAX, tax));
    }
    Ok(draft)
}

// ----------------------------------------------------------------- returns

pub struct ReturnParams {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub tax_rate: Decimal,
    pub method: PayMethod,
    pub counterparty: String,
    pub reason: Option<String>,
}

/// Mirror of a sale: revenue and output tax come back out, the customer
/// is made whole for the gross amount.
pub fn sales_return(p: &ReturnParams) -> Result<Draft, LedgerError> {
    require_positive(p.amount)?;
    require_non_negative(p.tax_rate)?;
    let tax = tax_on(p.amount, p.tax_rate);
    let gross = p.amount + tax;
    let description = format!("Sales return from {}", p.counterparty);
    let mut draft = Draft::new(p.date, TxnKind::SalesReturn, description)
        .line(JournalLine::debit(codes::SALES, p.amount));
    if tax > Decimal::ZERO {
        draft = draft.line(JournalLine::debit(codes::OUTPUT_TAX, tax));
    }
    draft = draft.line(JournalLine::credit(
        tender_account(p.method, codes::RECEIVABLE),
        gross,
    ));
    Ok(draft)
}

/// Mirror of a purchase: goods go back, input tax is surrendered, the
/// supplier owes us (or refunds) the gross amount.
pub fn purchase_return(p: &ReturnParams) -> Result<Draft, LedgerError> {
    require_positive(p.amount)?;
    require_non_negative(p.tax_rate)?;
    let tax = tax_on(p.amount, p.tax_rate);
    let gross = p.amount + tax;
    let description = format!("Purchase return to {}", p.counterparty);
    let mut draft = Draft::new(p.date, TxnKind::PurchaseReturn, description)
        .line(JournalLine::debit(tender_account(p.method, codes::PAYABLE), gross))
        .line(JournalLine::credit(codes::INVENTORY, p.amount));
    if tax > Decimal::ZERO {
        draft = draft.line(JournalLine::credit(codes::INPUT_TAX, tax));
    }
    Ok(draft)
}

/// Post a return and its satellite record in one storage transaction.
pub fn post_return(
    conn: &mut Connection,
    period: &Period,
    p: &ReturnParams,
    kind: TxnKind,
) -> Result<(Transaction, i64), LedgerError> {
    let draft = match kind {
        TxnKind::PurchaseReturn => purchase_return(p)?,
        _ => sales_return(p)?,
    };
    validate(conn, period, &draft)?;
    let tx = conn.transaction()?;
    let posted = apply(&tx, draft)?;
    let record_id = store::insert_return(
        &tx,
        kind,
        &p.counterparty,
        p.amount,
        p.date,
        p.reason.as_deref(),
        posted.id,
    )?;
    tx.commit()?;
    Ok((posted, record_id))
}

// ---------------------------------------------------------- tax settlement

pub struct SettleParams {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub method: PayMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Settle the net tax position against cash/bank: pay down output tax
/// when net is payable, surrender input tax against the refund when net
/// is receivable. The settlement record is written atomically with the
/// posting. Rejects amounts beyond the open position.
pub fn settle_tax(
    conn: &mut Connection,
    period: &Period,
    p: SettleParams,
) -> Result<(Transaction, Settlement), LedgerError> {
    require_positive(p.amount)?;

    let output = store::get_account(conn, codes::OUTPUT_TAX)?
        .ok_or_else(|| LedgerError::UnknownAccount(codes::OUTPUT_TAX.into()))?;
    let input = store::get_account(conn, codes::INPUT_TAX)?
        .ok_or_else(|| LedgerError::UnknownAccount(codes::INPUT_TAX.into()))?;
    // liability balances are credit-negative in the signed cache
    let net = -output.balance - input.balance;
    if p.amount > net.abs() {
        return Err(LedgerError::AmountExceedsNetTax {
            amount: p.amount,
            net,
        });
    }

    let cash = tender_account(p.method, codes::BANK);
    let (draft, direction) = if net > Decimal::ZERO {
        let d = Draft::new(p.date, TxnKind::TaxSettlement, "Tax settlement payment".to_string())
            .with_reference(p.reference.clone())
            .line(JournalLine::debit(codes::OUTPUT_TAX, p.amount))
            .line(JournalLine::credit(cash, p.amount));
        (d, "payment")
    } else {
        let d = Draft::new(p.date, TxnKind::TaxSettlement, "Tax refund received".to_string())
            .with_reference(p.reference.clone())
            .line(JournalLine::debit(cash, p.amount))
            .line(JournalLine::credit(codes::INPUT_TAX, p.amount));
        (d, "refund")
    };

    validate(conn, period, &draft)?;
    let tx = conn.transaction()?;
    let posted = apply(&tx, draft)?;
    let settlement_id = store::insert_settlement(
        &tx,
        p.date,
        p.amount,
        p.method,
        &posted.reference,
        p.notes.as_deref(),
        direction,
        posted.id,
    )?;
    tx.commit()?;

    Ok((
        posted.clone(),
        Settlement {
            id: settlement_id,
            date: p.date,
            amount: p.amount,
            method: p.method,
            reference: posted.reference,
            notes: p.notes,
            direction: direction.to_string(),
            transaction_id: posted.id,
        },
    ))
}
