//! Static source corpora used across harnesses.
//!
//! Each corpus is the full text of one delimited extract, header included.
//! Together `PRE_WAR_CSV`, `WEEK_BEFORE_CSV` and `WAR_CSV` make a small but
//! complete three-source merge that straddles the structural break.

use fake::faker::company::en::CompanyName;
use fake::Fake;

pub const HEADER: &str = "event_id_cnty,event_date,actor1,actor2,event_type,sub_event_type,admin1,source_scale,latitude,longitude,geo_precision,fatalities";

/// Five pre-war rows, all valid.
pub const PRE_WAR_CSV: &str = "\
event_id_cnty,event_date,actor1,actor2,event_type,sub_event_type,admin1,source_scale,latitude,longitude,geo_precision,fatalities
SDN1,2019-06-03,Military Forces of Sudan (2019-2023) Rapid Support Forces,Protesters (Sudan),Violence against civilians,Attack,Khartoum,National,15.5881,32.5342,1,61
SDN2,2019-06-30,Protesters (Sudan),,Protests,Peaceful protest,Khartoum,National,15.6,32.53,1,0
SDN3,2021-10-25,Military Forces of Sudan (2019-),Protesters (Sudan),Violence against civilians,Excessive force against protesters,Khartoum,International,15.6,32.53,1,7
SDN4,2022-01-17,Rioters (Sudan),Police Forces of Sudan (2019-),Riots,Violent demonstration,Al Jazirah,Subnational,14.4,33.5,2,0
SDN5,2023-03-02,Unidentified Armed Group (Sudan),Civilians (Sudan),Violence against civilians,Attack,North Darfur,Local partner-Other,13.6,25.35,3,2
";

/// One row from the week before the break.
pub const WEEK_BEFORE_CSV: &str = "\
event_id_cnty,event_date,actor1,actor2,event_type,sub_event_type,admin1,source_scale,latitude,longitude,geo_precision,fatalities
SDN6,2023-04-13,Rapid Support Forces,,Strategic developments,Disrupted weapons use,Northern,National,19.5,30.2,2,0
";

/// Five war-period rows. The header uses provider spellings that only match
/// after standardization, and the first date is in export style.
pub const WAR_CSV: &str = "\
Event ID Cnty, Event Date ,Actor1,Actor2,Event-Type,Sub Event Type,ADMIN1,Source Scale,Latitude,Longitude,Geo Precision,Fatalities
SDN7,15 April 2023,Rapid Support Forces,Military Forces of Sudan (2019-),Battles,Armed clash,Khartoum,National,15.6,32.53,1,56
SDN8,2023-05-20,Military Forces of Sudan (2019-),Rapid Support Forces,Battles,Armed clash,Khartoum,International,15.63,32.48,2,22
SDN9,2023-11-04,Rapid Support Forces,Civilians (Sudan),Violence against civilians,Attack,West Darfur,New media,13.45,22.44,1,80
SDN10,2024-06-05,Rapid Support Forces,Civilians (Sudan),Violence against civilians,Attack,Al Jazirah,Subnational,14.1,33.2,1,104
SDN11,2025-01-10,Military Forces of Sudan (2019-),,Battles,Armed clash,Al Qadarif,National,,,3,5
";

/// Five rows, one of which reports negative fatalities.
pub const ONE_NEGATIVE_CSV: &str = "\
event_date,actor1,fatalities,geo_precision
2023-05-01,Rapid Support Forces,3,1
2023-05-02,Rapid Support Forces,-1,1
2023-05-03,Military Forces of Sudan (2019-),0,2
2023-05-04,Protesters (Sudan),0,1
2023-05-05,Unidentified Armed Group (Sudan),7,3
";

/// Every row fails for a different reason, except the last.
pub const MIXED_FAILURES_CSV: &str = "\
event_date,actor1,fatalities,geo_precision,latitude,longitude
,Rapid Support Forces,3,1,,
not a date,Rapid Support Forces,3,1,,
2010-01-01,Rapid Support Forces,3,1,,
2023-05-01,Rapid Support Forces,,1,,
2023-05-01,Rapid Support Forces,three,1,,
2023-05-01,Rapid Support Forces,3,,,
2023-05-01,Rapid Support Forces,3,x,,
2023-05-01,Rapid Support Forces,3,4,,
2023-05-01,Rapid Support Forces,3,1,95.0,32.5
2023-05-01,Rapid Support Forces,3,1,15.6,32.5
";

/// An extract without the `event_date` column.
pub const MISSING_DATE_COLUMN_CSV: &str = "\
actor1,fatalities,geo_precision
Rapid Support Forces,3,1
";

/// The three-source merge in configured order.
pub fn three_sources() -> [(&'static str, &'static str); 3] {
    [
        ("pre_war", PRE_WAR_CSV),
        ("week_before", WEEK_BEFORE_CSV),
        ("war_period", WAR_CSV),
    ]
}

/// Generated actor names that no taxonomy rule should recognise.
pub fn unmapped_actor_names(n: usize) -> Vec<String> {
    (0..n)
        .map(|_| format!("{} Militia", CompanyName().fake::<String>()))
        .collect()
}
