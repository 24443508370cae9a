//! Fills in per-sample device-clock timestamps from sparse STATUS anchors,
//! then maps device time into absolute GPS time using TIM-TP packets.
use collar_core::{GpsTime, TimTpPacket};

/// Step 1: walk each `[begin, end]` partition of `update_marks` backwards,
/// seeding from the anchor one past the partition end and subtracting the
/// nominal sample interval as we go.
///
/// `update_marks` holds the running segment counter snapshotted at each
/// STATUS segment (starting at -1, so the first partition usually begins
/// at -1). A partition `i` spans `reset_time[update_marks[i]+1 ..=
/// update_marks[i+1]]`.
pub fn fill_device_clock(reset_time: &mut [GpsTime], update_marks: &[i32], sample_rate_ms: u32, sample_rate_ns: u32) {
    if update_marks.len() < 2 {
        return;
    }
    for w in update_marks.windows(2) {
        let begin = w[0];
        let end = w[1];
        if end < 0 || (end as usize + 1) >= reset_time.len() {
            continue;
        }

        let mut ms_count = reset_time[end as usize + 1].milli_num as i64;
        let mut ns_count = reset_time[end as usize + 1].nano_num as i64;

        let mut j = end;
        while j > begin {
            let idx = j as usize;
            reset_time[idx].milli_num = ms_count as u32;
            reset_time[idx].nano_num = ns_count as u32;

            ms_count -= sample_rate_ms as i64;
            ns_count -= sample_rate_ns as i64;
            if ns_count < 0 {
                ms_count -= 1;
                ns_count = 1_000_000 - ns_count.abs();
            }

            j -= 1;
        }
    }
}

/// Step 2: apply the sparse device->GPS offset carried by `tim_tp_packets`
/// to every entry of `reset_time`, advancing the lookup index as samples
/// cross a time-pulse boundary. A no-op if no time-pulse packets were seen
/// in this chunk.
pub fn apply_gps_offset(reset_time: &mut [GpsTime], tim_tp_packets: &[TimTpPacket]) {
    if tim_tp_packets.is_empty() {
        return;
    }

    let mut k = 0usize;
    let mut offset_ms = tim_tp_packets[k].gps_ms as i64 - tim_tp_packets[k].reset_time_ms as i64;
    let mut offset_week = tim_tp_packets[k].gps_week as i64 - tim_tp_packets[k].reset_time_week as i64;
    let offset_ns: i64 = 0;

    for t in reset_time.iter_mut() {
        if k + 1 < tim_tp_packets.len() && tim_tp_packets[k + 1].reset_time_ms < t.milli_num {
            if k < tim_tp_packets.len() - 1 {
                k += 1;
            }
            offset_ms = tim_tp_packets[k].gps_ms as i64 - tim_tp_packets[k].reset_time_ms as i64;
            offset_week = tim_tp_packets[k].gps_week as i64 - tim_tp_packets[k].reset_time_week as i64;
        }

        t.gps_week_num = (t.week_num as i64 + offset_week) as u32;
        t.gps_milli_num = (t.milli_num as i64 + offset_ms) as u32;
        t.gps_nano_num = (t.nano_num as i64 + offset_ns) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gps_time(week: u32, ms: u32, ns: u32) -> GpsTime {
        GpsTime {
            week_num: week,
            milli_num: ms,
            nano_num: ns,
            ..Default::default()
        }
    }

    #[test]
    fn fill_device_clock_counts_backward_by_sample_interval() {
        let mut times = vec![
            gps_time(2000, 0, 0),
            gps_time(2000, 0, 0),
            gps_time(2000, 0, 0),
            gps_time(2000, 100, 0),
        ];
        // Partition [-1, 2] anchored by times[3].
        let update_marks = vec![-1, 2];
        fill_device_clock(&mut times, &update_marks, 1, 49_000);

        assert_eq!(times[2].milli_num, 100);
        assert_eq!(times[1].milli_num, 98);
        assert_eq!(times[0].milli_num, 97);
        assert_eq!(times[0].nano_num, 902_000);
    }

    #[test]
    fn apply_gps_offset_adds_constant_offset_between_pulses() {
        let mut times = vec![gps_time(10, 50, 0), gps_time(10, 150, 0)];
        let packets = vec![
            TimTpPacket {
                reset_time_week: 10,
                reset_time_ms: 0,
                reset_time_ns: 0,
                gps_week: 20,
                gps_ms: 200,
                gps_ns: 0,
            },
            TimTpPacket {
                reset_time_week: 10,
                reset_time_ms: 100,
                reset_time_ns: 0,
                gps_week: 20,
                gps_ms: 350,
                gps_ns: 0,
            },
        ];
        apply_gps_offset(&mut times, &packets);

        assert_eq!(times[0].gps_milli_num, 250);
        assert_eq!(times[1].gps_milli_num, 400);
    }

    #[test]
    fn no_time_pulse_packets_is_a_no_op() {
        let mut times = vec![gps_time(1, 1, 1)];
        apply_gps_offset(&mut times, &[]);
        assert_eq!(times[0].gps_week_num, 0);
    }
}
