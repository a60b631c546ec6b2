use rulegen::Parser;

#[derive(Parser)]
#[abnf_inline = "address = city \", \" state\ncity = \"Albany\" / \"Troy\"\nstate = \"NY\""]
pub struct AddressParser;

#[test]
fn rule_named_state() {
    let toks = AddressParser::parse(Rule::address, "Albany, NY").unwrap();
    let got: Vec<(Rule, &str)> = toks.iter().map(|t| (t.rule(), t.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (Rule::address, "Albany, NY"),
            (Rule::city, "Albany"),
            (Rule::state, "NY"),
        ]
    );
    assert!(AddressParser::parse(Rule::state, "ny").is_err());
}
