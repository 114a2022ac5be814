// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[test]
fn independent_processors_keep_declaration_order() {
    let regs = vec![MessageProcessorRegistration::new("auth"), MessageProcessorRegistration::new("log")];
    let order = topological_order(&regs).unwrap();
    assert_eq!(order, vec![ProcessorName::new("auth"), ProcessorName::new("log")]);
}

#[test]
fn after_constraint_is_honored() {
    let regs = vec![
        MessageProcessorRegistration::new("log").after("auth"),
        MessageProcessorRegistration::new("auth"),
    ];
    let order = topological_order(&regs).unwrap();
    assert_eq!(order, vec![ProcessorName::new("auth"), ProcessorName::new("log")]);
}

#[test]
fn before_constraint_is_honored() {
    let regs = vec![
        MessageProcessorRegistration::new("auth").before("log"),
        MessageProcessorRegistration::new("log"),
    ];
    let order = topological_order(&regs).unwrap();
    assert_eq!(order, vec![ProcessorName::new("auth"), ProcessorName::new("log")]);
}

#[test]
fn direct_cycle_is_rejected() {
    let regs = vec![
        MessageProcessorRegistration::new("a").after("b"),
        MessageProcessorRegistration::new("b").after("a"),
    ];
    assert!(topological_order(&regs).is_err());
}

#[test]
fn applicability_all_matches_every_message_type() {
    struct Ping;
    let reg = MessageProcessorRegistration::new("any");
    assert!(reg.applicability.applies_to(MessageType::of::<Ping>()));
}

#[test]
fn applicability_only_restricts_to_listed_types() {
    struct Ping;
    struct Pong;
    let reg = MessageProcessorRegistration::new("only-ping").only_for(vec![MessageType::of::<Ping>()]);
    assert!(reg.applicability.applies_to(MessageType::of::<Ping>()));
    assert!(!reg.applicability.applies_to(MessageType::of::<Pong>()));
}
