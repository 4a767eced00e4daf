pub mod canadian_ct_head;
pub mod curb65;
pub mod heart;
pub mod perc;
pub mod wells_pe;
