mod tests {
    use cct_dimmer::channel::{Channel, QueueFull};

    #[test]
    fn test_send_receive_in_order() {
        let channel: Channel<u8, 4> = Channel::new();
        let sender = channel.sender();
        let receiver = channel.receiver();

        sender.try_send(1).unwrap();
        sender.try_send(2).unwrap();
        assert_eq!(channel.len(), 2);

        assert_eq!(receiver.try_receive(), Some(1));
        assert_eq!(receiver.try_receive(), Some(2));
        assert_eq!(receiver.try_receive(), None);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_full_queue_returns_value() {
        let channel: Channel<u8, 2> = Channel::new();
        channel.try_send(1).unwrap();
        channel.try_send(2).unwrap();
        assert_eq!(channel.try_send(3), Err(QueueFull(3)));
    }

    #[test]
    fn test_drain_empties_in_arrival_order() {
        let channel: Channel<u8, 4> = Channel::new();
        for value in [4, 5, 6] {
            channel.try_send(value).unwrap();
        }

        let mut seen = Vec::new();
        channel.receiver().drain(|value| seen.push(value));
        assert_eq!(seen, vec![4, 5, 6]);
        assert!(channel.is_empty());
    }
}
