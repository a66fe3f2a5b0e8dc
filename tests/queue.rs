mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use sputter_animation::queue::{TryReceiveError, TrySendError};
    use sputter_animation::{
        AnimationEngine, AnimationEngineConfig, ChannelState, ControlIntent, IntentProcessor,
        IntentQueue, MemoryModeStore, ModeId,
    };

    #[test]
    fn test_mode_intents_are_bounded_fifo() {
        let queue: IntentQueue<2> = IntentQueue::new();
        let sender = queue.sender();
        let receiver = queue.receiver();

        assert!(queue.is_empty());
        assert_eq!(sender.try_send(ControlIntent::SetMode(ModeId::Fire)), Ok(()));
        assert_eq!(sender.try_send(ControlIntent::CycleMode), Ok(()));
        assert_eq!(
            sender.try_send(ControlIntent::CycleMode),
            Err(TrySendError(ControlIntent::CycleMode))
        );
        assert_eq!(queue.len(), 2);

        assert_eq!(receiver.try_receive(), Ok(ControlIntent::SetMode(ModeId::Fire)));
        assert_eq!(receiver.try_receive(), Ok(ControlIntent::CycleMode));
        assert_eq!(receiver.try_receive(), Err(TryReceiveError));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_setter_burst_coalesces_in_place() {
        let queue: IntentQueue<4> = IntentQueue::new();
        let sender = queue.sender();

        sender.try_send(ControlIntent::SetHues([1, 2, 3, 4])).unwrap();
        sender.try_send(ControlIntent::SetMode(ModeId::TriadicRain)).unwrap();
        for step in 0..100 {
            sender.try_send(ControlIntent::SetHues([step; 4])).unwrap();
            sender.try_send(ControlIntent::SetBrightnesses([50; 4])).unwrap();
            sender.try_send(ControlIntent::SetPowers([step % 2 == 0; 4])).unwrap();
        }
        assert_eq!(queue.len(), 4);

        let receiver = queue.receiver();
        assert_eq!(receiver.try_receive(), Ok(ControlIntent::SetHues([99; 4])));
        assert_eq!(
            receiver.try_receive(),
            Ok(ControlIntent::SetMode(ModeId::TriadicRain))
        );
        assert_eq!(receiver.try_receive(), Ok(ControlIntent::SetBrightnesses([50; 4])));
        assert_eq!(receiver.try_receive(), Ok(ControlIntent::SetPowers([false; 4])));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_still_accepts_newer_setter() {
        let queue: IntentQueue<2> = IntentQueue::new();
        let sender = queue.sender();

        sender.try_send(ControlIntent::SetPowers([true; 4])).unwrap();
        sender.try_send(ControlIntent::CycleMode).unwrap();
        assert_eq!(sender.try_send(ControlIntent::SetPowers([false; 4])), Ok(()));
        assert_eq!(
            sender.try_send(ControlIntent::SetHues([0; 4])),
            Err(TrySendError(ControlIntent::SetHues([0; 4])))
        );
        assert_eq!(
            queue.receiver().try_receive(),
            Ok(ControlIntent::SetPowers([false; 4]))
        );
    }

    #[test]
    fn test_only_setters_supersede() {
        let hues = ControlIntent::SetHues([0; 4]);
        assert!(hues.is_superseded_by(&ControlIntent::SetHues([10; 4])));
        assert!(!hues.is_superseded_by(&ControlIntent::SetBrightnesses([10; 4])));
        assert!(!ControlIntent::CycleMode.is_superseded_by(&ControlIntent::CycleMode));
        assert!(
            !ControlIntent::SetMode(ModeId::Fire)
                .is_superseded_by(&ControlIntent::SetMode(ModeId::None))
        );
    }

    #[test]
    fn test_processor_applies_intents_in_order() {
        let queue: IntentQueue<8> = IntentQueue::new();
        let sender = queue.sender();
        let mut processor = IntentProcessor::new(queue.receiver());
        let mut engine: AnimationEngine<SmallRng, MemoryModeStore, ChannelState, 16> =
            AnimationEngine::new(
                SmallRng::seed_from_u64(1),
                MemoryModeStore::new(),
                &AnimationEngineConfig::default(),
            );

        assert_eq!(processor.process_pending(&mut engine), 0);

        sender.try_send(ControlIntent::SetHues([10, 20, 370, 40])).unwrap();
        sender.try_send(ControlIntent::SetBrightnesses([5, 6, 7, 8])).unwrap();
        sender.try_send(ControlIntent::SetPowers([false, true, true, true])).unwrap();
        sender.try_send(ControlIntent::SetMode(ModeId::Fire)).unwrap();
        sender.try_send(ControlIntent::CycleMode).unwrap();

        assert_eq!(processor.process_pending(&mut engine), 5);
        assert!(queue.is_empty());
        assert_eq!(engine.current_mode(), ModeId::None);
        assert_eq!(engine.store().writes(), 2);
        assert_eq!(engine.channels()[2].hue, 10);
        assert_eq!(engine.channels()[3].brightness, 8);
        assert!(!engine.channels()[0].power);
    }
}
