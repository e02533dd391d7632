use crate::channel::Channel;

#[test]
fn test_channel_order_is_total() {
    for a in Channel::ALL {
        for b in Channel::ALL {
            let most = Channel::most_restrictive(a, b);
            let least = Channel::least_restrictive(a, b);
            assert!(most == a || most == b);
            assert!(least == a || least == b);
            assert!(least <= most);
        }
    }
}

#[test]
fn test_most_and_least_restrictive_are_complementary() {
    for a in Channel::ALL {
        for b in Channel::ALL {
            let most = Channel::most_restrictive(a, b);
            let least = Channel::least_restrictive(a, b);
            if a == b {
                assert_eq!(most, least);
            } else {
                assert_ne!(most, least);
                assert!((most == a && least == b) || (most == b && least == a));
            }
        }
    }
}

#[test]
fn test_channel_helpers_are_idempotent() {
    for a in Channel::ALL {
        assert_eq!(Channel::most_restrictive(a, a), a);
        assert_eq!(Channel::least_restrictive(a, a), a);
    }
}

#[test]
fn test_channel_restriction_order() {
    assert_eq!(
        Channel::most_restrictive(Channel::Stable, Channel::Dev),
        Channel::Dev
    );
    assert_eq!(
        Channel::least_restrictive(Channel::Canary, Channel::Beta),
        Channel::Beta
    );
    assert!(Channel::Stable < Channel::Beta);
    assert!(Channel::Canary < Channel::Trunk);
}

#[test]
fn test_channel_doc_tags() {
    assert_eq!(Channel::Stable.doc_tag(), None);
    assert_eq!(Channel::Beta.doc_tag(), Some("beta"));
    assert_eq!(Channel::Dev.doc_tag(), Some("alpha"));
    assert_eq!(Channel::Trunk.doc_tag(), Some("alpha"));
}

#[test]
fn test_channel_parses_from_str() {
    assert_eq!("dev".parse::<Channel>(), Ok(Channel::Dev));
    assert!("nightly".parse::<Channel>().is_err());
}
