//! Sale lifecycle tests, run for both locked and unlocked sales:
//! 1. Deployment properties
//! 2. Buying during the sale window
//! 3. Withdrawal by the owner after the end
//! 4. Claiming escrowed tokens (locked sales)

use coinlab_core::{ether, Address, Amount, Ledger, LedgerEvent, NativeBalances, Timestamp, Token};
use coinlab_ico::*;

const INITIAL_SUPPLY: Amount = ether(100);
const OFFER_SUPPLY: Amount = ether(20);
const BUY_AMOUNT: Amount = ether(1);
const PRICE: Amount = 100;
const TOKEN_AMOUNT: Amount = BUY_AMOUNT / PRICE;
const TIME: u64 = 3600;
const DEPLOYED_AT: Timestamp = 1_700_000_000;

struct Fixture {
    erc20: Token,
    native: NativeBalances,
    ico: Ico,
    owner: Address,
    alice: Address,
    bob: Address,
}

fn deploy(locked: bool) -> Fixture {
    let owner = Address::from_label("owner");
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");

    let mut erc20 = Token::new(Address::contract(&owner, 0), "Dev", "DEV", owner, INITIAL_SUPPLY);
    let ico = Ico::deploy(
        Address::contract(&owner, 1),
        owner,
        SaleParams::new(erc20.address(), OFFER_SUPPLY, PRICE, TIME, locked),
        DEPLOYED_AT,
    )
    .expect("Failed to deploy sale");
    erc20.approve(owner, ico.address(), OFFER_SUPPLY).unwrap();
    erc20.drain_events();

    let mut native = NativeBalances::new();
    for account in [alice, bob] {
        native.credit(account, ether(10_000)).unwrap();
    }

    Fixture {
        erc20,
        native,
        ico,
        owner,
        alice,
        bob,
    }
}

fn end_of_sale() -> Timestamp {
    DEPLOYED_AT + TIME
}

#[test]
fn test_deployment() {
    for locked in [true, false] {
        let f = deploy(locked);
        assert_eq!(f.ico.erc20(), f.erc20.address());
        assert_eq!(f.ico.erc20_owner(), f.owner);
        assert_eq!(f.ico.offer(), OFFER_SUPPLY);
        assert_eq!(f.ico.price(), PRICE);
        assert!(f.ico.end_time() > TIME);
        assert_eq!(f.ico.locked(), locked);
        assert_eq!(f.ico.remaining_offer(&f.erc20), OFFER_SUPPLY);
    }
}

#[test]
fn test_buy() {
    for locked in [true, false] {
        let mut f = deploy(locked);

        let receipt = f
            .ico
            .buy(&mut f.erc20, &mut f.native, f.alice, BUY_AMOUNT, DEPLOYED_AT)
            .expect("Buy failed");

        let destination = if locked { f.ico.address() } else { f.alice };
        assert_eq!(receipt.output, TOKEN_AMOUNT);
        assert_eq!(f.erc20.balance_of(&destination), TOKEN_AMOUNT);
        assert_eq!(f.erc20.balance_of(&f.owner), INITIAL_SUPPLY - TOKEN_AMOUNT);
        assert_eq!(
            f.erc20.allowance(&f.owner, &f.ico.address()),
            OFFER_SUPPLY - TOKEN_AMOUNT
        );
        assert_eq!(f.ico.balance(), BUY_AMOUNT);

        assert!(receipt.has_ledger_event(&LedgerEvent::Transfer {
            from: f.owner,
            to: destination,
            value: TOKEN_AMOUNT,
        }));
        assert!(receipt.has_ledger_event(&LedgerEvent::Approval {
            owner: f.owner,
            spender: f.ico.address(),
            value: OFFER_SUPPLY - TOKEN_AMOUNT,
        }));
        assert!(receipt.has_event(&IcoEvent::Bought {
            buyer: f.alice,
            amount: BUY_AMOUNT,
        }));
    }
}

#[test]
fn test_buy_more_than_offer() {
    for locked in [true, false] {
        let mut f = deploy(locked);
        f.ico
            .buy(&mut f.erc20, &mut f.native, f.alice, BUY_AMOUNT, DEPLOYED_AT)
            .unwrap();

        let err = f
            .ico
            .buy(&mut f.erc20, &mut f.native, f.bob, OFFER_SUPPLY * PRICE, DEPLOYED_AT)
            .unwrap_err();
        assert_eq!(err.to_string(), "ICO: offer less than amount sent");
        assert_eq!(f.ico.balance(), BUY_AMOUNT);
        assert_eq!(f.native.balance_of(&f.bob), ether(10_000));
    }
}

#[test]
fn test_buy_after_end() {
    let mut f = deploy(true);
    let err = f
        .ico
        .buy(&mut f.erc20, &mut f.native, f.bob, BUY_AMOUNT, end_of_sale())
        .unwrap_err();
    assert_eq!(err.to_string(), "ICO: cannot buy after end of ico");
}

#[test]
fn test_buy_by_owner() {
    let mut f = deploy(false);
    let err = f
        .ico
        .buy(&mut f.erc20, &mut f.native, f.owner, BUY_AMOUNT, DEPLOYED_AT)
        .unwrap_err();
    assert_eq!(err.to_string(), "ICO: owner cannot buy his token");
}

#[test]
fn test_scaled_payment_scenario() {
    let f = deploy(false);
    assert_eq!(f.ico.token_amount(1), 0);
    assert_eq!(f.ico.token_amount(10u128.pow(18)), 10u128.pow(16));
}

#[test]
fn test_withdraw() {
    for locked in [true, false] {
        let mut f = deploy(locked);
        f.ico
            .buy(&mut f.erc20, &mut f.native, f.alice, BUY_AMOUNT, DEPLOYED_AT)
            .unwrap();

        let err = f
            .ico
            .withdraw(&mut f.native, f.bob, end_of_sale())
            .unwrap_err();
        assert_eq!(err.to_string(), "ICO: reserved too owner of erc20");

        let receipt = f
            .ico
            .withdraw(&mut f.native, f.owner, end_of_sale())
            .expect("Withdraw failed");
        assert_eq!(f.native.balance_of(&f.owner), BUY_AMOUNT);
        assert_eq!(f.ico.balance(), 0);
        assert_eq!(f.native.balance_of(&f.ico.address()), 0);
        assert!(receipt.has_event(&IcoEvent::Withdrew {
            owner: f.owner,
            amount: BUY_AMOUNT,
        }));
    }
}

#[test]
fn test_withdraw_before_end() {
    let mut f = deploy(true);
    let err = f
        .ico
        .withdraw(&mut f.native, f.owner, DEPLOYED_AT)
        .unwrap_err();
    assert_eq!(err.to_string(), "ICO: cannot withdraw before end of ico");
}

#[test]
fn test_claim() {
    let mut f = deploy(true);
    f.ico
        .buy(&mut f.erc20, &mut f.native, f.alice, BUY_AMOUNT, DEPLOYED_AT)
        .unwrap();
    assert_eq!(f.erc20.balance_of(&f.alice), 0);

    let receipt = f
        .ico
        .claim(&mut f.erc20, f.alice, end_of_sale())
        .expect("Claim failed");

    assert_eq!(f.erc20.balance_of(&f.alice), TOKEN_AMOUNT);
    assert_eq!(f.erc20.balance_of(&f.ico.address()), 0);
    assert_eq!(
        receipt.ledger_events,
        vec![LedgerEvent::Transfer {
            from: f.ico.address(),
            to: f.alice,
            value: TOKEN_AMOUNT,
        }]
    );
    assert!(receipt.has_event(&IcoEvent::Claimed {
        buyer: f.alice,
        amount: TOKEN_AMOUNT,
    }));
}

#[test]
fn test_claim_before_end() {
    let mut f = deploy(true);
    f.ico
        .buy(&mut f.erc20, &mut f.native, f.alice, BUY_AMOUNT, DEPLOYED_AT)
        .unwrap();

    let err = f
        .ico
        .claim(&mut f.erc20, f.alice, end_of_sale() - 1)
        .unwrap_err();
    assert_eq!(err.to_string(), "ICO: cannot claim before end of ico");
    assert_eq!(f.ico.escrowed(&f.alice), TOKEN_AMOUNT);
}

#[test]
fn test_claims_are_per_buyer() {
    let mut f = deploy(true);
    f.ico
        .buy(&mut f.erc20, &mut f.native, f.alice, BUY_AMOUNT, DEPLOYED_AT)
        .unwrap();
    f.ico
        .buy(&mut f.erc20, &mut f.native, f.bob, 3 * BUY_AMOUNT, DEPLOYED_AT + 1)
        .unwrap();
    f.ico
        .buy(&mut f.erc20, &mut f.native, f.alice, BUY_AMOUNT, DEPLOYED_AT + 2)
        .unwrap();

    f.ico.claim(&mut f.erc20, f.bob, end_of_sale()).unwrap();
    assert_eq!(f.erc20.balance_of(&f.bob), 3 * TOKEN_AMOUNT);
    assert_eq!(f.erc20.balance_of(&f.ico.address()), 2 * TOKEN_AMOUNT);

    f.ico.claim(&mut f.erc20, f.alice, end_of_sale()).unwrap();
    assert_eq!(f.erc20.balance_of(&f.alice), 2 * TOKEN_AMOUNT);
    assert_eq!(f.erc20.balance_of(&f.ico.address()), 0);
    assert_eq!(f.ico.total_escrowed(), 0);
}

#[test]
fn test_separate_token_owner() {
    let deployer = Address::from_label("sale-operator");
    let holder = Address::from_label("treasury");
    let buyer = Address::from_label("alice");

    let mut erc20 = Token::new(Address::contract(&holder, 0), "Dev", "DEV", holder, INITIAL_SUPPLY);
    let mut ico = Ico::deploy(
        Address::contract(&deployer, 0),
        deployer,
        SaleParams::new(erc20.address(), OFFER_SUPPLY, PRICE, TIME, false).with_token_owner(holder),
        DEPLOYED_AT,
    )
    .unwrap();
    erc20.approve(holder, ico.address(), OFFER_SUPPLY).unwrap();
    let mut native = NativeBalances::new();
    native.credit(buyer, BUY_AMOUNT).unwrap();

    ico.buy(&mut erc20, &mut native, buyer, BUY_AMOUNT, DEPLOYED_AT).unwrap();
    assert_eq!(erc20.balance_of(&holder), INITIAL_SUPPLY - TOKEN_AMOUNT);

    let err = ico.withdraw(&mut native, holder, end_of_sale()).unwrap_err();
    assert_eq!(err, IcoError::NotSaleOwner);
    ico.withdraw(&mut native, deployer, end_of_sale()).unwrap();
    assert_eq!(native.balance_of(&deployer), BUY_AMOUNT);
}
