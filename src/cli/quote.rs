use serde::Serialize;

use super::args::QuoteArgs;
use super::output;
use crate::domain::{from_decimal, BondingCurve, Prices, Reserves};
use crate::error::Result;

#[derive(Serialize)]
struct QuoteReport {
    shares: u64,
    amount: u64,
    fee: u64,
    prices_before: Prices,
    prices_after: Prices,
    reserves_after: Reserves,
}

/// Price a single buy or sell on the given reserves.
pub fn execute(args: &QuoteArgs) -> Result<()> {
    let reserves = Reserves::new(from_decimal(args.yes)?, from_decimal(args.no)?)?;
    let shares = from_decimal(args.shares)?;
    let prices_before = BondingCurve::prices(&reserves)?;

    let (amount, fee, reserves_after) = if args.sell {
        let quote = BondingCurve::quote_sell(&reserves, args.outcome, shares, args.fee_bps)?;
        (quote.net, quote.fee, quote.reserves_after)
    } else {
        let quote = BondingCurve::quote_buy(&reserves, args.outcome, shares, args.fee_bps)?;
        (quote.total, quote.fee, quote.reserves_after)
    };
    let prices_after = BondingCurve::prices(&reserves_after)?;

    if args.json {
        return output::json(&QuoteReport {
            shares,
            amount,
            fee,
            prices_before,
            prices_after,
            reserves_after,
        });
    }

    let verb = if args.sell { "Sell" } else { "Buy" };
    output::section(&format!("{verb} {} {} shares", output::amount(shares), args.outcome));
    output::key_value(
        if args.sell { "Receive" } else { "Pay" },
        output::amount(amount),
    );
    output::key_value("Fee", output::amount(fee));
    output::prices("Before", &prices_before);
    output::prices("After", &prices_after);
    output::key_value(
        "Reserves after",
        format!(
            "YES {} / NO {}",
            output::amount(reserves_after.yes()),
            output::amount(reserves_after.no())
        ),
    );
    Ok(())
}
