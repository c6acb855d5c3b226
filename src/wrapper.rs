
use crate::config::WrapperConfig;
use crate::hand::{Hand, HandKeypoints, KEYPOINT_COUNT};
use crate::provider::{FeatureRegistry, HandTracker, LeapWrapperCallback, WorldClock};
use crate::skeleton::convert_to_leap_space;
use crate::{tracy_span, warn_once};
use leapc::{LEAP_DEVICE_INFO, LEAP_HAND, LEAP_TRACKING_EVENT};
use log::{debug, info, warn};
use std::ops::Deref;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WrapperState {
    /// No hand tracker was found. Frames never contain hands.
    Unbound,
    Bound,
}

/// A frame handed out by the wrapper. It borrows the wrapper's buffers, so it is only valid until
/// the next query.
pub struct Frame<'a> {
    event: &'a LEAP_TRACKING_EVENT,
    hands: &'a [LEAP_HAND],
}

impl<'a> Frame<'a> {
    #[inline]
    pub fn event(&self) -> &'a LEAP_TRACKING_EVENT {
        self.event
    }

    /// The hands `pHands` points at, `nHands` long.
    #[inline]
    pub fn hands(&self) -> &'a [LEAP_HAND] {
        self.hands
    }
}

impl Deref for Frame<'_> {
    type Target = LEAP_TRACKING_EVENT;

    fn deref(&self) -> &Self::Target {
        self.event
    }
}

#[derive(Copy, Clone)]
struct Acquisition {
    id: u32,
    /// Frame timestamp the hand was first seen at.
    since: i64,
}

/// Presents an XR hand tracker as a LeapC tracking source.
///
/// The wrapper owns one tracking event and two hands and rewrites them in place on every query;
/// frames borrow from it. It is not meant to be shared between threads, callers must serialize
/// access (in practice the engine's game thread is the only caller).
pub struct OpenXrToLeapWrapper<R: FeatureRegistry> {
    registry: R,
    config: WrapperConfig,
    hand_tracker: Option<R::Tracker>,
    callback: Option<Box<dyn LeapWrapperCallback>>,
    clock: Option<Box<dyn WorldClock>>,
    device_info: LEAP_DEVICE_INFO,
    frame: LEAP_TRACKING_EVENT,
    /// left, right
    hands: [LEAP_HAND; 2],
    keypoints: [HandKeypoints; 2],
    acquisitions: [Option<Acquisition>; 2],
    next_hand_id: u32,
}

impl<R: FeatureRegistry> OpenXrToLeapWrapper<R> {
    pub fn new(registry: R, config: WrapperConfig) -> Self {
        let frame = LEAP_TRACKING_EVENT {
            framerate: config.framerate,
            ..Default::default()
        };

        Self {
            registry,
            config,
            hand_tracker: None,
            callback: None,
            clock: None,
            // No device properties are known about the XR runtime.
            device_info: LEAP_DEVICE_INFO::default(),
            frame,
            hands: Hand::BOTH.map(|hand| LEAP_HAND::new(hand.into())),
            keypoints: [HandKeypoints::new(), HandKeypoints::new()],
            acquisitions: [None; 2],
            next_hand_id: 1,
        }
    }

    /// Records `callback` and binds to the hand tracker, if one can be found. When a tracker is
    /// bound `callback` is told about the (placeholder) device before this returns.
    ///
    /// A wrapper that is already bound stays bound and does not report the device again.
    pub fn open_connection(
        &mut self,
        callback: Option<Box<dyn LeapWrapperCallback>>,
    ) -> WrapperState {
        self.callback = callback;

        if self.hand_tracker.is_some() {
            debug!("Hand tracker already bound");
        } else {
            self.bind_hand_tracker();
        }

        self.state()
    }

    fn bind_hand_tracker(&mut self) {
        let module = &self.config.hand_tracking_module;
        let feature = &self.config.hand_tracker_feature;

        debug!("Loading module {module}");
        self.registry.load_module(module);

        let Some(tracker) = self.registry.find_hand_tracker(feature) else {
            warn!("No \"{feature}\" feature available, frames will not contain hands");
            return;
        };

        info!("Bound to hand tracker \"{feature}\"");
        self.hand_tracker = Some(tracker);

        if let Some(callback) = &self.callback {
            callback.on_device_found(&self.device_info);
        }
    }

    #[inline]
    pub fn state(&self) -> WrapperState {
        match self.hand_tracker {
            Some(_) => WrapperState::Bound,
            None => WrapperState::Unbound,
        }
    }

    #[inline]
    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    /// Sets the clock frames are timestamped with. Without one, timestamps are 0.
    pub fn set_clock(&mut self, clock: Option<Box<dyn WorldClock>>) {
        self.clock = clock;
    }

    pub fn get_device_properties(&self) -> &LEAP_DEVICE_INFO {
        &self.device_info
    }

    /// Storage slot of `hand`, whether or not it is part of the last frame.
    pub fn hand(&self, hand: Hand) -> &LEAP_HAND {
        &self.hands[hand.slot()]
    }

    /// Keypoints are pulled in [`get_frame`](Self::get_frame), so there is nothing to do here.
    pub fn update_hand_state(&self) {}

    /// Interpolation is not supported: this returns the latest frame, whatever `timestamp` is.
    pub fn get_interpolated_frame_at_time(&mut self, timestamp: i64) -> Frame<'_> {
        warn_once!("Interpolated frames are not supported, returning the latest frame instead");
        log::trace!("Interpolated frame requested at {timestamp}");
        self.get_frame()
    }

    /// Polls the hand tracker and returns an updated frame.
    pub fn get_frame(&mut self) -> Frame<'_> {
        tracy_span!("OpenXrToLeapWrapper::get_frame");

        let Some(tracker) = &self.hand_tracker else {
            self.frame.pHands = self.hands.as_mut_ptr();
            return Frame {
                event: &self.frame,
                hands: &self.hands[..0],
            };
        };

        // Only true while the runtime can see the hand. Some runtimes never track hands outside
        // of a VR session.
        let mut tracked = [false; 2];
        for hand in Hand::BOTH {
            let keypoints = &mut self.keypoints[hand.slot()];
            keypoints.clear();
            tracked[hand.slot()] = tracker.get_all_keypoint_states(hand, keypoints);
        }

        let timestamp = self.timestamp();
        let hand_count = tracked.iter().filter(|t| **t).count();
        self.frame.nHands = hand_count as u32;
        self.frame.info.frame_id += 1;
        self.frame.info.timestamp = timestamp;
        self.frame.tracking_frame_id += 1;

        for hand in Hand::BOTH {
            if tracked[hand.slot()] {
                self.update_tracked_hand(hand, timestamp);
            } else {
                self.lose_hand(hand);
            }
        }

        let first = if tracked[Hand::Left.slot()] {
            Hand::Left.slot()
        } else {
            Hand::Right.slot()
        };
        self.frame.pHands = self.hands[first..].as_mut_ptr();

        Frame {
            event: &self.frame,
            hands: &self.hands[first..first + hand_count],
        }
    }

    fn update_tracked_hand(&mut self, hand: Hand, timestamp: i64) {
        let slot = hand.slot();
        let keypoints = &self.keypoints[slot];
        if keypoints.len() < KEYPOINT_COUNT {
            warn_once!(
                "Hand tracker reported {} keypoints for {:?}, expected {}",
                keypoints.len(),
                hand,
                KEYPOINT_COUNT
            );
        }

        let acquisition = match self.acquisitions[slot] {
            Some(acquisition) => acquisition,
            None => {
                let acquisition = Acquisition {
                    id: self.next_hand_id,
                    since: timestamp,
                };
                self.next_hand_id = self.next_hand_id.checked_add(1).unwrap_or(1);
                debug!("{hand:?} hand found, id {}", acquisition.id);
                self.acquisitions[slot] = Some(acquisition);
                acquisition
            }
        };

        let leap_hand = &mut self.hands[slot];
        leap_hand.id = acquisition.id;
        leap_hand.visible_time = timestamp.saturating_sub(acquisition.since).max(0) as u64;
        convert_to_leap_space(leap_hand, keypoints);
    }

    fn lose_hand(&mut self, hand: Hand) {
        let slot = hand.slot();
        if let Some(acquisition) = self.acquisitions[slot].take() {
            debug!("{hand:?} hand lost, id {}", acquisition.id);
        }

        if self.config.clear_untracked_hands {
            self.hands[slot] = LEAP_HAND::new(hand.into());
        }
    }

    /// Microseconds of simulation time.
    fn timestamp(&self) -> i64 {
        self.clock
            .as_ref()
            .map_or(0, |clock| (clock.time_seconds() * 1_000_000.0) as i64)
    }
}
